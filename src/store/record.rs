//! The persisted deployment record.

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// What a frontend needs to talk to the deployed contract: where it lives
/// and how to call it. Exactly these two fields, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Deployed contract address, written in checksum form.
    #[serde(serialize_with = "serialize_checksummed")]
    pub address: Address,
    /// Full contract interface as produced by the compiler.
    pub abi: JsonAbi,
}

fn serialize_checksummed<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&address.to_checksum(None))
}
