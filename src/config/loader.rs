//! Configuration loading.
//!
//! # Data Flow
//! ```text
//! optional TOML file (deployer.toml)
//!     → parse & deserialize (serde defaults fill the gaps)
//!     → environment overlay (RPC_URL, PRIVATE_KEY), applied exactly once
//!     → semantic validation
//!     → DeployerConfig (immutable for the rest of the process)
//! ```
//!
//! Pipeline stages never read the environment themselves; everything they need
//! arrives through the struct built here.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

use crate::config::schema::{DeployerConfig, Secret, PRIVATE_KEY_ENV_VAR, RPC_URL_ENV_VAR};

/// Config file probed when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "deployer.toml";

/// Errors raised while resolving configuration or the accounts derived from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No RPC endpoint configured at all.
    #[error(
        "rpc endpoint is not set; set [chain].rpc_url or the {RPC_URL_ENV_VAR} environment variable"
    )]
    MissingRpcEndpoint,

    /// RPC endpoint present but not a usable URL.
    #[error("invalid rpc endpoint '{url}': {reason}")]
    InvalidRpcEndpoint { url: String, reason: String },

    /// No signing key supplied.
    #[error("signing key is not set; export {PRIVATE_KEY_ENV_VAR}")]
    MissingSigningKey,

    /// Signing key present but unparseable. The offending value is never
    /// included in the message.
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),

    /// One or more semantic validation failures.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load configuration from an optional TOML file, overlay the environment, and
/// validate.
///
/// With no explicit path, `deployer.toml` is used when present; otherwise the
/// schema defaults apply. `RPC_URL` and `PRIVATE_KEY` always win over file
/// values so the binaries work from environment alone.
pub fn load_config(path: Option<&Path>) -> Result<DeployerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.exists() {
                read_config_file(default)?
            } else {
                DeployerConfig::default()
            }
        }
    };

    if let Ok(url) = std::env::var(RPC_URL_ENV_VAR) {
        config.chain.rpc_url = url;
    }
    if let Ok(key) = std::env::var(PRIVATE_KEY_ENV_VAR) {
        config.chain.private_key = Some(Secret::new(key));
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<DeployerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Semantic validation. Collects every failure rather than stopping at the
/// first so an operator can fix a config file in one pass.
///
/// Presence of the signing key is deliberately not enforced here: the info
/// server runs without one, and the account resolver checks it when the
/// pipeline actually needs to sign.
pub fn validate_config(config: &DeployerConfig) -> Result<(), ConfigError> {
    let mut problems = Vec::new();

    if !config.chain.rpc_url.is_empty() {
        if let Err(err) = url::Url::parse(&config.chain.rpc_url) {
            problems.push(format!(
                "chain.rpc_url '{}' is not a valid URL: {err}",
                config.chain.rpc_url
            ));
        }
    }

    if let Err(err) = U256::from_str(&config.contract.entry_fee_wei) {
        problems.push(format!(
            "contract.entry_fee_wei '{}' is not a valid integer: {err}",
            config.contract.entry_fee_wei
        ));
    }

    match config.vrf.provider.as_str() {
        "local" => {}
        "configured" => {
            match &config.vrf.coordinator {
                Some(addr) => {
                    if let Err(err) = Address::from_str(addr) {
                        problems.push(format!("vrf.coordinator '{addr}' is invalid: {err}"));
                    }
                }
                None => problems.push(
                    "vrf.coordinator is required when vrf.provider = \"configured\"".to_string(),
                ),
            }
            match &config.vrf.key_hash {
                Some(hash) => {
                    if let Err(err) = B256::from_str(hash) {
                        problems.push(format!("vrf.key_hash '{hash}' is invalid: {err}"));
                    }
                }
                None => problems.push(
                    "vrf.key_hash is required when vrf.provider = \"configured\"".to_string(),
                ),
            }
        }
        other => problems.push(format!(
            "vrf.provider '{other}' is unknown (expected \"local\" or \"configured\")"
        )),
    }

    if config.confirmation.poll_interval_ms == 0 {
        problems.push("confirmation.poll_interval_ms must be greater than 0".to_string());
    }
    if config.chain.rpc_timeout_secs == 0 {
        problems.push("chain.rpc_timeout_secs must be greater than 0".to_string());
    }
    if config.store.record_path.is_empty() {
        problems.push("store.record_path must not be empty".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(problems.join("; ")))
    }
}
