//! Deployment transaction assembly, signing, and submission.
//!
//! # Responsibilities
//! - Validate and ABI-encode constructor parameters (before any RPC)
//! - Assemble the create transaction from fresh chain state
//! - Sign locally and submit the raw payload exactly once
//!
//! Chain id, gas price, and nonce are read from the node on every build and
//! never cached across attempts.

use alloy::dyn_abi::{DynSolValue, JsonAbiExt, Specifier};
use alloy::eips::eip2718::Encodable2718;
use alloy::json_abi::JsonAbi;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::client::EvmClient;
use crate::blockchain::types::RpcError;
use crate::blockchain::wallet::Wallet;
use crate::compiler::CompiledArtifact;
use crate::pipeline::error::DeployError;

/// Intrinsic transaction cost plus create overhead and constructor headroom.
const CREATE_GAS_BASE: u64 = 60_000;
/// Per init-code byte: calldata cost plus code-deposit cost.
const GAS_PER_INIT_BYTE: u64 = 220;

/// ABI-encode constructor parameters after checking them against the
/// compiled interface.
///
/// Pure function; runs before any network traffic so a mismatch costs
/// nothing. A contract without a constructor accepts only an empty
/// parameter list.
pub fn encode_constructor_args(
    abi: &JsonAbi,
    params: &[DynSolValue],
) -> Result<Vec<u8>, DeployError> {
    let Some(constructor) = abi.constructor() else {
        if params.is_empty() {
            return Ok(Vec::new());
        }
        return Err(DeployError::ParameterMismatch(format!(
            "contract has no constructor but {} parameter(s) were supplied",
            params.len()
        )));
    };

    if constructor.inputs.len() != params.len() {
        return Err(DeployError::ParameterMismatch(format!(
            "constructor takes {} parameter(s), {} supplied",
            constructor.inputs.len(),
            params.len()
        )));
    }

    for (index, (input, value)) in constructor.inputs.iter().zip(params).enumerate() {
        let expected = input.resolve().map_err(|e| {
            DeployError::ParameterMismatch(format!(
                "cannot resolve type of constructor parameter {index} '{}': {e}",
                input.name
            ))
        })?;
        if !expected.matches(value) {
            let supplied = value
                .sol_type_name()
                .unwrap_or_else(|| "unknown".into());
            return Err(DeployError::ParameterMismatch(format!(
                "constructor parameter {index} '{}' expects {}, got {supplied}",
                input.name, input.ty
            )));
        }
    }

    constructor
        .abi_encode_input(params)
        .map_err(|e| DeployError::ParameterMismatch(e.to_string()))
}

/// Assemble the deployment transaction for a compiled artifact.
///
/// Parameters are encoded first; only then is the node consulted for chain
/// id, gas price, and the sender's nonce. The gas limit is derived from the
/// init-code size rather than asking the node to simulate.
pub async fn build_deployment(
    artifact: &CompiledArtifact,
    from: Address,
    params: &[DynSolValue],
    client: &EvmClient,
) -> Result<TransactionRequest, DeployError> {
    let encoded_args = encode_constructor_args(&artifact.abi, params)?;

    let chain_id = client.chain_id().await?;
    let gas_price = client.gas_price().await?;
    let nonce = client.transaction_count(from).await?;

    let mut init_code = artifact.bytecode.to_vec();
    init_code.extend_from_slice(&encoded_args);
    let gas_limit = deployment_gas_limit(init_code.len());

    tracing::debug!(
        contract = %artifact.contract_name,
        chain_id = chain_id.0,
        nonce,
        gas_price,
        gas_limit,
        init_code_bytes = init_code.len(),
        "Deployment transaction assembled"
    );

    let request = TransactionRequest::default()
        .with_from(from)
        .with_chain_id(chain_id.0)
        .with_nonce(nonce)
        .with_gas_price(gas_price)
        .with_gas_limit(gas_limit)
        .with_deploy_code(init_code);

    Ok(request)
}

/// Sign the assembled request and submit it as raw bytes.
///
/// Consumes the wallet so the key does not outlive the submission. A node
/// rejection is terminal for this invocation; the same payload would be
/// rejected again.
pub async fn sign_and_submit(
    request: TransactionRequest,
    wallet: Wallet,
    client: &EvmClient,
) -> Result<TxHash, DeployError> {
    let from = wallet.address();
    let envelope = request
        .build(&wallet.into_signing())
        .await
        .map_err(|e| DeployError::Signer(e.to_string()))?;
    let raw = envelope.encoded_2718();

    tracing::info!(from = %from, payload_bytes = raw.len(), "Submitting deployment transaction");

    match client.send_raw_transaction(&raw).await {
        Ok(tx_hash) => {
            tracing::info!(tx_hash = %tx_hash, "Transaction accepted by node");
            Ok(tx_hash)
        }
        Err(RpcError::Rejected { reason }) => Err(DeployError::SubmissionRejected { reason }),
        Err(other) => Err(DeployError::Rpc(other)),
    }
}

/// Gas limit from init-code size: intrinsic + create overhead, plus calldata
/// and code-deposit cost per byte.
fn deployment_gas_limit(init_code_len: usize) -> u64 {
    CREATE_GAS_BASE + init_code_len as u64 * GAS_PER_INIT_BYTE
}
