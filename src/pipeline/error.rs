//! Unified error taxonomy for the deployment pipeline.
//!
//! Subsystem errors convert in via `#[from]` so a stage failure propagates
//! upward unmodified; variants defined here cover failures that only make
//! sense at the pipeline level (parameter mismatch, submission verdicts,
//! confirmation outcomes).

use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::types::RpcError;
use crate::compiler::CompilerError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Everything that can go wrong between reading a source file and writing
/// the deployment record.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Toolchain missing or the source failed to compile.
    #[error(transparent)]
    Compiler(#[from] CompilerError),

    /// Endpoint or signing key absent or malformed.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Supplied constructor parameters do not fit the compiled ABI. Raised
    /// before any network traffic.
    #[error("constructor parameter mismatch: {0}")]
    ParameterMismatch(String),

    /// Local signing failed. Nothing was sent.
    #[error("signing failed: {0}")]
    Signer(String),

    /// The node refused the signed transaction. Not retried; the payload
    /// would be refused again.
    #[error("submission rejected by node: {reason}")]
    SubmissionRejected { reason: String },

    /// The deadline passed without the transaction being included.
    #[error("no confirmation after {attempts} polls over {elapsed:?}")]
    ConfirmationTimeout { attempts: u32, elapsed: Duration },

    /// The node no longer knows the transaction and no receipt exists.
    #[error("transaction {0} was dropped from the pool before inclusion")]
    TransactionDropped(TxHash),

    /// Included, but the constructor reverted.
    #[error("deployment transaction {tx_hash} reverted in block {block_number}")]
    DeploymentReverted { tx_hash: TxHash, block_number: u64 },

    /// Included successfully yet the receipt names no contract address.
    /// Means the payload was not a create transaction, or the node is
    /// misbehaving.
    #[error("transaction {0} was included but created no contract")]
    NoContractAddress(TxHash),

    /// Writing or reading the deployment record failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// A single RPC operation failed (transport or timeout).
    #[error(transparent)]
    Rpc(#[from] RpcError),
}
