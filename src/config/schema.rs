//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer
//! and the info server. All types derive Serde traits for deserialization from
//! the optional TOML config file; secrets are excluded from (de)serialization
//! and only enter through the environment overlay in the loader.

use serde::{Deserialize, Serialize};

/// Environment variable holding the JSON-RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// Environment variable holding the signing key. Never echoed in logs.
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// Root configuration, constructed once at process start and passed by
/// reference into the pipeline stages.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployerConfig {
    /// Network endpoint and signing identity.
    pub chain: ChainConfig,

    /// Contract source and constructor inputs.
    pub contract: ContractConfig,

    /// Randomness coordinator selection.
    pub vrf: VrfConfig,

    /// Compiler invocation settings.
    pub compiler: CompilerConfig,

    /// Receipt polling policy.
    pub confirmation: ConfirmationConfig,

    /// Deployment record persistence.
    pub store: StoreConfig,

    /// Info server settings.
    pub server: ServerConfig,
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL. Overridden by `RPC_URL`.
    pub rpc_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Signing key, supplied only via `PRIVATE_KEY`. Redacted in Debug output
    /// and never written back to disk.
    #[serde(skip)]
    pub private_key: Option<Secret>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            rpc_timeout_secs: 10,
            private_key: None,
        }
    }
}

/// Contract compilation target and constructor inputs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Path to the Solidity source file.
    pub source: String,

    /// Contract name to select from the compiler output.
    pub name: String,

    /// Lottery entry fee in wei, as a decimal (or 0x-prefixed) string.
    pub entry_fee_wei: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            source: "contracts/Lottery.sol".to_string(),
            name: "Lottery".to_string(),
            // 0.01 ether
            entry_fee_wei: "10000000000000000".to_string(),
        }
    }
}

/// Randomness coordinator configuration.
///
/// `local` stands in for a real coordinator on development chains; the
/// `configured` provider takes the coordinator address, subscription id, and
/// key hash from this section verbatim.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VrfConfig {
    /// Provider selection: "local" or "configured".
    pub provider: String,

    /// Subscription id passed to the contract constructor.
    pub subscription_id: u64,

    /// Coordinator contract address (required for "configured").
    pub coordinator: Option<String>,

    /// Gas-lane key hash, 32 bytes hex (required for "configured").
    pub key_hash: Option<String>,
}

impl Default for VrfConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            subscription_id: 12345,
            coordinator: None,
            key_hash: None,
        }
    }
}

/// Compiler invocation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Path to the solc binary. Resolved via PATH when not absolute.
    pub solc_path: String,

    /// Enable the solc optimizer.
    pub optimizer: bool,

    /// Optimizer runs, used when the optimizer is enabled.
    pub optimizer_runs: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            solc_path: "solc".to_string(),
            optimizer: false,
            optimizer_runs: 200,
        }
    }
}

/// Receipt polling policy for the confirmation waiter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Fixed polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Overall deadline in seconds; elapsing it is a confirmation timeout.
    pub deadline_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            deadline_secs: 180,
        }
    }
}

/// Deployment record persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the persisted record file.
    pub record_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            record_path: "data/contract_info.json".to_string(),
        }
    }
}

/// Info server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Secret material wrapper. Displays and debugs as a fixed placeholder so the
/// wrapped value cannot reach logs through formatting.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the wrapped value. Callers must not log or persist it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = DeployerConfig::default();
        assert_eq!(config.chain.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(config.contract.name, "Lottery");
        assert_eq!(config.contract.entry_fee_wei, "10000000000000000");
        assert_eq!(config.vrf.provider, "local");
        assert_eq!(config.vrf.subscription_id, 12345);
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert!(config.chain.private_key.is_none());
    }

    #[test]
    fn test_secret_never_leaks_through_formatting() {
        let secret = Secret::new("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80");
        assert_eq!(format!("{secret}"), "<redacted>");
        assert_eq!(format!("{secret:?}"), "Secret(<redacted>)");

        // A derived Debug on the enclosing config must not leak either.
        let mut config = ChainConfig::default();
        config.private_key = Some(secret);
        assert!(!format!("{config:?}").contains("ac0974"));
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let mut config = DeployerConfig::default();
        config.chain.private_key = Some(Secret::new("supersecret"));
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("supersecret"));
    }

    #[test]
    fn test_partial_file_fills_remaining_defaults() {
        let config: DeployerConfig = toml::from_str(
            r#"
            [chain]
            rpc_url = "http://10.0.0.7:8545"

            [confirmation]
            poll_interval_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.rpc_url, "http://10.0.0.7:8545");
        assert_eq!(config.chain.rpc_timeout_secs, 10);
        assert_eq!(config.confirmation.poll_interval_ms, 500);
        assert_eq!(config.confirmation.deadline_secs, 180);
        assert_eq!(config.store.record_path, "data/contract_info.json");
    }
}
