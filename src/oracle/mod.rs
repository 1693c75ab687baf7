//! Randomness coordinator capability.
//!
//! The deployed contract needs a coordinator address, a subscription id, and
//! a key hash at construction time. Where those values come from depends on
//! the environment: a local chain has no real coordinator, a testnet does.
//! Sources implement [`RandomnessSource`]; the pipeline asks the selected
//! source for its [`CoordinatorBinding`] instead of hardcoding an argument
//! order.

pub mod configured;
pub mod local;

pub use configured::ConfiguredSource;
pub use local::LocalSource;

use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::schema::VrfConfig;

/// Coordinator parameters a contract is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorBinding {
    /// Address of the coordinator contract the deployment will talk to.
    pub coordinator: Address,
    /// Subscription funding the randomness requests.
    pub subscription_id: u64,
    /// Gas-lane key hash for fulfillment.
    pub key_hash: B256,
}

/// Handle for one randomness request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from interpreting coordinator callbacks.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Fulfillment payload did not decode to a 32-byte word.
    #[error("malformed fulfillment payload: {0}")]
    MalformedCallback(String),
}

/// A provider of randomness-coordinator parameters and fulfillments.
pub trait RandomnessSource: Send + Sync + std::fmt::Debug {
    /// Coordinator parameters for a contract deployed by `deployer`.
    fn binding(&self, deployer: Address) -> CoordinatorBinding;

    /// Ask for `num_words` random words. Ids are sequential within a
    /// process.
    fn request_value(&self, num_words: u32) -> RequestId;

    /// Decode a fulfillment callback payload into the random value.
    fn interpret_callback(&self, payload: &[u8]) -> Result<U256, OracleError>;
}

/// Select and construct the source named by configuration.
pub fn from_config(config: &VrfConfig) -> Result<Box<dyn RandomnessSource>, ConfigError> {
    match config.provider.as_str() {
        "local" => Ok(Box::new(LocalSource::new(config.subscription_id))),
        "configured" => {
            let coordinator = require_field(&config.coordinator, "vrf.coordinator")?;
            let key_hash = require_field(&config.key_hash, "vrf.key_hash")?;
            let coordinator = Address::from_str(coordinator).map_err(|e| {
                ConfigError::Invalid(format!("vrf.coordinator '{coordinator}' is invalid: {e}"))
            })?;
            let key_hash = B256::from_str(key_hash).map_err(|e| {
                ConfigError::Invalid(format!("vrf.key_hash '{key_hash}' is invalid: {e}"))
            })?;
            Ok(Box::new(ConfiguredSource::new(
                coordinator,
                config.subscription_id,
                key_hash,
            )))
        }
        other => Err(ConfigError::Invalid(format!(
            "vrf.provider '{other}' is unknown (expected \"local\" or \"configured\")"
        ))),
    }
}

fn require_field<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or_else(|| {
        ConfigError::Invalid(format!(
            "{name} is required when vrf.provider = \"configured\""
        ))
    })
}

/// Shared callback decoding: one big-endian 32-byte word.
pub(crate) fn decode_word(payload: &[u8]) -> Result<U256, OracleError> {
    if payload.len() != 32 {
        return Err(OracleError::MalformedCallback(format!(
            "expected 32 bytes, got {}",
            payload.len()
        )));
    }
    Ok(U256::from_be_slice(payload))
}
