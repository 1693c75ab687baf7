//! Chain-facing types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during a single JSON-RPC operation.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection, DNS, or response-decoding failure.
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// RPC request exceeded the configured timeout.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node answered with a JSON-RPC error response. The request reached
    /// the node and was refused; retrying the same payload will not help.
    #[error("rejected by node: {reason}")]
    Rejected { reason: String },
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Proof that a deployment transaction was included successfully.
///
/// Only ever constructed from a receipt whose status is success and which
/// carries a contract address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Hash of the included transaction.
    pub tx_hash: TxHash,
    /// Address the new contract lives at.
    pub contract_address: Address,
    /// Block the transaction was included in.
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(31337u64);
        assert_eq!(chain_id.0, 31337);
        assert_eq!(u64::from(chain_id), 31337);
    }

    #[test]
    fn test_error_display() {
        let err = RpcError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = RpcError::Rejected {
            reason: "insufficient funds for gas * price + value".to_string(),
        };
        assert!(err.to_string().contains("insufficient funds"));
    }
}
