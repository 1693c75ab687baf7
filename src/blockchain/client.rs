//! JSON-RPC network handle with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the configured JSON-RPC endpoint
//! - Query chain parameters (chain id, gas price, nonce)
//! - Submit raw transactions and fetch receipts
//!
//! Every operation is a single provider call bounded by the configured
//! timeout. There is no retry here; callers decide whether a failure is
//! retryable.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::transports::TransportError;
use tokio::time::timeout;

use crate::blockchain::types::{ChainId, RpcError, RpcResult};
use crate::config::loader::ConfigError;
use crate::config::schema::ChainConfig;

/// Handle to the deployment target chain.
#[derive(Clone)]
pub struct EvmClient {
    provider: Arc<dyn Provider + Send + Sync>,
    /// Endpoint kept for diagnostics only.
    rpc_url: String,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl EvmClient {
    /// Create a new client for the configured endpoint.
    ///
    /// Fails on a missing or malformed URL. Performs no network I/O; the
    /// first RPC error surfaces from whichever operation runs first.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        if config.rpc_url.is_empty() {
            return Err(ConfigError::MissingRpcEndpoint);
        }
        let url: url::Url =
            config
                .rpc_url
                .parse()
                .map_err(|e: url::ParseError| ConfigError::InvalidRpcEndpoint {
                    url: config.rpc_url.clone(),
                    reason: e.to_string(),
                })?;

        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        tracing::debug!(
            rpc_url = %config.rpc_url,
            timeout_secs = config.rpc_timeout_secs,
            "Chain client initialized"
        );

        Ok(Self {
            provider,
            rpc_url: config.rpc_url.clone(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Get the chain ID from the RPC.
    pub async fn chain_id(&self) -> RpcResult<ChainId> {
        let fut = self.provider.get_chain_id();
        self.bounded(fut).await.map(ChainId)
    }

    /// Get the current gas price in wei.
    pub async fn gas_price(&self) -> RpcResult<u128> {
        let fut = self.provider.get_gas_price();
        self.bounded(fut).await
    }

    /// Get the transaction count (next nonce) for an address.
    pub async fn transaction_count(&self, address: Address) -> RpcResult<u64> {
        let fut = self.provider.get_transaction_count(address);
        self.bounded(fut).await
    }

    /// Submit a signed, 2718-encoded transaction and return its hash.
    ///
    /// A JSON-RPC error response here means the node refused the payload
    /// (insufficient funds, nonce conflict, malformed bytes) and surfaces as
    /// [`RpcError::Rejected`].
    pub async fn send_raw_transaction(&self, encoded_tx: &[u8]) -> RpcResult<TxHash> {
        let fut = self.provider.send_raw_transaction(encoded_tx);
        let pending = self.bounded(fut).await?;
        Ok(*pending.tx_hash())
    }

    /// Get a transaction receipt by hash. `None` until the transaction is
    /// included in a block.
    pub async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> RpcResult<Option<TransactionReceipt>> {
        let fut = self.provider.get_transaction_receipt(tx_hash);
        self.bounded(fut).await
    }

    /// Check whether the node still knows a transaction at all (pending or
    /// mined). A `false` answer after submission means the transaction was
    /// evicted from the pool.
    ///
    /// A node that knows the hash may answer in a shape we cannot fully
    /// decode; for this probe any non-null answer counts as known.
    pub async fn transaction_known(&self, tx_hash: TxHash) -> RpcResult<bool> {
        let fut = self.provider.get_transaction_by_hash(tx_hash);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(tx)) => Ok(tx.is_some()),
            Ok(Err(TransportError::DeserError { .. })) => Ok(true),
            Ok(Err(err)) => Err(classify(err)),
            Err(_) => Err(RpcError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn bounded<T, F>(&self, fut: F) -> RpcResult<T>
    where
        F: std::future::IntoFuture<Output = Result<T, TransportError>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(classify(err)),
            Err(_) => Err(RpcError::Timeout(self.timeout_duration.as_secs())),
        }
    }
}

/// Split node-side refusals from everything else. An error response carries
/// the node's own message; transport and decoding failures are folded into
/// [`RpcError::Transport`].
fn classify(err: TransportError) -> RpcError {
    match err {
        TransportError::ErrorResp(payload) => RpcError::Rejected {
            reason: payload.message.to_string(),
        },
        other => RpcError::Transport(other.to_string()),
    }
}

impl std::fmt::Debug for EvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_config(url: &str) -> ChainConfig {
        ChainConfig {
            rpc_url: url.to_string(),
            rpc_timeout_secs: 5,
            private_key: None,
        }
    }

    #[test]
    fn test_rejects_empty_endpoint() {
        let err = EvmClient::new(&chain_config("")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRpcEndpoint));
    }

    #[test]
    fn test_rejects_malformed_endpoint() {
        let err = EvmClient::new(&chain_config("not a url")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRpcEndpoint { .. }));
    }

    #[test]
    fn test_construction_needs_no_network() {
        // Nothing listens on this port; construction must still succeed.
        let client = EvmClient::new(&chain_config("http://127.0.0.1:1")).unwrap();
        assert_eq!(client.rpc_url(), "http://127.0.0.1:1");
    }

    #[test]
    fn test_debug_shows_endpoint_only() {
        let client = EvmClient::new(&chain_config("http://127.0.0.1:8545")).unwrap();
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("http://127.0.0.1:8545"));
    }
}
