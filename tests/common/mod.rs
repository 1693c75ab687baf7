//! Shared utilities for integration testing: a scriptable JSON-RPC node,
//! a compiled-artifact fixture, and config builders.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy::hex;
use alloy::json_abi::JsonAbi;
use alloy::primitives::{keccak256, Bytes};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use contract_deployer::compiler::CompiledArtifact;
use contract_deployer::config::{DeployerConfig, Secret};

/// Well-known Anvil development key (account 0). Test-only.
pub const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address derived from [`DEV_KEY`].
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Behavior script for the mock node. Field defaults describe a healthy
/// node that confirms on the first receipt poll.
pub struct MockNode {
    /// The receipt appears on the Nth `eth_getTransactionReceipt` call.
    /// Zero means the receipt never appears.
    pub receipt_after: u32,
    /// Receipt status field, `"0x1"` for success and `"0x0"` for revert.
    pub receipt_status: &'static str,
    /// Address reported in the receipt's `contractAddress` field. `None`
    /// produces an explicit null, as seen for plain transfers.
    pub contract_address: Option<&'static str>,
    /// When set, `eth_sendRawTransaction` answers with this error message
    /// instead of a hash.
    pub reject_message: Option<&'static str>,
    /// Whether `eth_getTransactionByHash` still knows the transaction.
    pub tx_known: bool,
}

impl Default for MockNode {
    fn default() -> Self {
        Self {
            receipt_after: 1,
            receipt_status: "0x1",
            contract_address: Some("0x5fbdb2315678afecb367f032d93f642f64180aa3"),
            reject_message: None,
            tx_known: true,
        }
    }
}

/// Handle to a running mock node: base URL plus per-method call counters.
pub struct NodeHandle {
    pub url: String,
    /// Every JSON-RPC request, regardless of method.
    pub total_calls: Arc<AtomicU32>,
    pub send_raw_calls: Arc<AtomicU32>,
    pub receipt_calls: Arc<AtomicU32>,
    pub tx_lookup_calls: Arc<AtomicU32>,
    /// Raw bytes of the last submitted transaction.
    pub last_raw_tx: Arc<Mutex<Option<Vec<u8>>>>,
}

struct NodeState {
    node: MockNode,
    total_calls: Arc<AtomicU32>,
    send_raw_calls: Arc<AtomicU32>,
    receipt_calls: Arc<AtomicU32>,
    tx_lookup_calls: Arc<AtomicU32>,
    last_raw_tx: Arc<Mutex<Option<Vec<u8>>>>,
}

/// Start a mock node on an ephemeral port and return its handle.
pub async fn start_mock_node(node: MockNode) -> NodeHandle {
    let total_calls = Arc::new(AtomicU32::new(0));
    let send_raw_calls = Arc::new(AtomicU32::new(0));
    let receipt_calls = Arc::new(AtomicU32::new(0));
    let tx_lookup_calls = Arc::new(AtomicU32::new(0));
    let last_raw_tx = Arc::new(Mutex::new(None));

    let state = Arc::new(NodeState {
        node,
        total_calls: total_calls.clone(),
        send_raw_calls: send_raw_calls.clone(),
        receipt_calls: receipt_calls.clone(),
        tx_lookup_calls: tx_lookup_calls.clone(),
        last_raw_tx: last_raw_tx.clone(),
    });

    let router = Router::new().route("/", post(rpc)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    NodeHandle {
        url: format!("http://{addr}"),
        total_calls,
        send_raw_calls,
        receipt_calls,
        tx_lookup_calls,
        last_raw_tx,
    }
}

async fn rpc(State(state): State<Arc<NodeState>>, Json(request): Json<Value>) -> Json<Value> {
    state.total_calls.fetch_add(1, Ordering::SeqCst);
    let method = request["method"].as_str().unwrap_or_default();
    let id = request["id"].clone();
    let params = &request["params"];

    let outcome = match method {
        "eth_chainId" => Ok(json!("0x7a69")),
        "eth_gasPrice" => Ok(json!("0x3b9aca00")),
        "eth_getTransactionCount" => Ok(json!("0x0")),
        "eth_sendRawTransaction" => {
            state.send_raw_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(message) = state.node.reject_message {
                Err(message.to_string())
            } else {
                let raw = params[0].as_str().unwrap_or_default();
                let bytes = hex::decode(raw).unwrap_or_default();
                let hash = keccak256(&bytes);
                *state.last_raw_tx.lock().unwrap() = Some(bytes);
                Ok(json!(format!("{hash}")))
            }
        }
        "eth_getTransactionReceipt" => {
            let calls = state.receipt_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if state.node.receipt_after > 0 && calls >= state.node.receipt_after {
                Ok(receipt_body(&state.node, params[0].clone()))
            } else {
                Ok(Value::Null)
            }
        }
        "eth_getTransactionByHash" => {
            state.tx_lookup_calls.fetch_add(1, Ordering::SeqCst);
            if state.node.tx_known {
                Ok(json!({ "hash": params[0] }))
            } else {
                Ok(Value::Null)
            }
        }
        other => Err(format!("unsupported method {other}")),
    };

    match outcome {
        Ok(result) => Json(json!({ "jsonrpc": "2.0", "id": id, "result": result })),
        Err(message) => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message },
        })),
    }
}

fn receipt_body(node: &MockNode, tx_hash: Value) -> Value {
    json!({
        "type": "0x0",
        "status": node.receipt_status,
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": "0x08b7831a4261c48e9cf7b2c79bbaa380f44a1ce7a1ce38e01f0d5686a42d3148",
        "blockNumber": "0x2a",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": null,
        "contractAddress": node.contract_address,
    })
}

/// Config pointed at the given node, signing with [`DEV_KEY`], with poll
/// timing tightened so failure cases resolve quickly.
pub fn test_config(rpc_url: &str, record_path: &std::path::Path) -> DeployerConfig {
    let mut config = DeployerConfig::default();
    config.chain.rpc_url = rpc_url.to_string();
    config.chain.private_key = Some(Secret::new(DEV_KEY));
    config.confirmation.poll_interval_ms = 25;
    config.confirmation.deadline_secs = 5;
    config.store.record_path = record_path.display().to_string();
    config
}

/// A compiled artifact with the lottery constructor shape and a short
/// but plausible creation bytecode.
pub fn sample_artifact() -> CompiledArtifact {
    let abi: JsonAbi = serde_json::from_value(json!([
        {
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [
                { "name": "_entryFee", "type": "uint256", "internalType": "uint256" },
                { "name": "_vrfCoordinator", "type": "address", "internalType": "address" },
                { "name": "_subscriptionId", "type": "uint256", "internalType": "uint256" },
                { "name": "_keyHash", "type": "bytes32", "internalType": "bytes32" }
            ]
        },
        {
            "type": "function",
            "name": "enter",
            "stateMutability": "payable",
            "inputs": [],
            "outputs": []
        }
    ]))
    .unwrap();

    CompiledArtifact {
        contract_name: "Lottery".to_string(),
        bytecode: Bytes::from(
            hex::decode("6080604052348015600f57600080fd5b506064600081905550607a8060266000396000f3fe")
                .unwrap(),
        ),
        abi,
    }
}
