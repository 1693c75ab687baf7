//! Deployer identity and signing key handling.
//!
//! # Security
//! - Private keys are loaded ONLY from the environment (via config overlay)
//! - Keys are never logged or serialized; Debug output shows the address
//! - The wallet is consumed at signing time so the key does not linger

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::config::loader::ConfigError;
use crate::config::schema::Secret;

/// The deployer identity: a local signing key and its derived address.
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key.
    ///
    /// Accepts the key with or without a `0x` prefix. The key material never
    /// appears in the returned error.
    pub fn from_secret(secret: &Secret) -> Result<Self, ConfigError> {
        let key_hex = secret.expose();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ConfigError::InvalidSigningKey(format!("{e}")))?;

        tracing::info!(address = %signer.address(), "Deployer wallet initialized");

        Ok(Self { signer })
    }

    /// The address transactions will originate from.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Consume the wallet and hand the key to the transaction builder.
    pub fn into_signing(self) -> EthereumWallet {
        EthereumWallet::from(self.signer)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .finish()
    }
}
