//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! DeployerConfig (endpoint + key, env-sourced)
//!     → resolve() → wallet.rs (identity) + client.rs (RPC handle)
//!     → transaction.rs (encode params, build, sign, submit)
//!     → confirm.rs (receipt polling until a verdict)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from the environment, via the config overlay
//! - Never log private keys; log the derived address instead
//! - All RPC calls have configurable timeouts and no hidden retries

pub mod client;
pub mod confirm;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::EvmClient;
pub use confirm::wait_for_inclusion;
pub use transaction::{build_deployment, encode_constructor_args, sign_and_submit};
pub use types::{ChainId, Confirmation, RpcError, RpcResult};
pub use wallet::Wallet;

use crate::config::loader::ConfigError;
use crate::config::schema::DeployerConfig;

/// Resolve the deployer identity and chain handle from configuration.
///
/// Fails with a configuration error when the signing key or endpoint is
/// absent or malformed. Performs no network I/O; the first RPC failure
/// surfaces from whichever pipeline stage talks to the node first.
pub fn resolve(config: &DeployerConfig) -> Result<(Wallet, EvmClient), ConfigError> {
    let secret = config
        .chain
        .private_key
        .as_ref()
        .ok_or(ConfigError::MissingSigningKey)?;
    let wallet = Wallet::from_secret(secret)?;
    let client = EvmClient::new(&config.chain)?;
    Ok((wallet, client))
}
