//! The deployment pipeline.
//!
//! # Data Flow
//! ```text
//! contracts/Lottery.sol
//!     → compiler   (solc --standard-json → CompiledArtifact)
//!     → resolve    (wallet identity + chain handle from config)
//!     → parameters (entry fee + coordinator binding → DynSolValue list)
//!     → build      (fresh chain id, gas price, nonce → TransactionRequest)
//!     → submit     (sign locally, send raw bytes once)
//!     → confirm    (poll receipts until verdict or deadline)
//!     → store      (atomic write of {address, abi})
//! ```
//!
//! Strictly linear: each stage's output is the next stage's input, nothing
//! runs concurrently, and no stage is retried within an invocation.

pub mod error;

pub use error::DeployError;

use std::path::Path;
use std::str::FromStr;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};

use crate::blockchain::{self, build_deployment, sign_and_submit, wait_for_inclusion};
use crate::compiler::{CompiledArtifact, SolcCompiler, SourceUnit};
use crate::config::loader::ConfigError;
use crate::config::schema::DeployerConfig;
use crate::oracle;
use crate::store::{DeploymentRecord, RecordStore};

/// Run the whole pipeline: compile the configured source, deploy it, and
/// persist the record.
pub async fn run(config: &DeployerConfig) -> Result<DeploymentRecord, DeployError> {
    tracing::info!(
        source = %config.contract.source,
        contract = %config.contract.name,
        "Deployment pipeline starting"
    );

    let source = SourceUnit::from_path(Path::new(&config.contract.source))?;

    let compiler = SolcCompiler::new(&config.compiler);
    compiler.ensure_available().await?;
    let artifact = compiler.compile(&source, &config.contract.name).await?;

    deploy_artifact(&artifact, config).await
}

/// Deploy an already-compiled artifact.
///
/// Split from [`run`] so deployment semantics do not depend on a solc
/// binary being present.
pub async fn deploy_artifact(
    artifact: &CompiledArtifact,
    config: &DeployerConfig,
) -> Result<DeploymentRecord, DeployError> {
    let (wallet, client) = blockchain::resolve(config)?;
    let deployer = wallet.address();
    tracing::info!(deployer = %deployer, rpc_url = %client.rpc_url(), "Deploying from account");

    let params = constructor_params(config, deployer)?;

    let request = build_deployment(artifact, deployer, &params, &client).await?;
    let tx_hash = sign_and_submit(request, wallet, &client).await?;
    let confirmation = wait_for_inclusion(&client, tx_hash, &config.confirmation).await?;

    let record = DeploymentRecord {
        address: confirmation.contract_address,
        abi: artifact.abi.clone(),
    };
    let store = RecordStore::new(&config.store.record_path);
    store.persist(&record)?;

    tracing::info!(
        address = %record.address,
        block_number = confirmation.block_number,
        record_path = %store.path().display(),
        "Deployment complete"
    );
    Ok(record)
}

/// Assemble constructor parameters from config plus the selected randomness
/// source: `(entry_fee, coordinator, subscription_id, key_hash)`.
fn constructor_params(
    config: &DeployerConfig,
    deployer: Address,
) -> Result<Vec<DynSolValue>, DeployError> {
    let entry_fee = U256::from_str(&config.contract.entry_fee_wei).map_err(|e| {
        ConfigError::Invalid(format!(
            "contract.entry_fee_wei '{}' is not a valid integer: {e}",
            config.contract.entry_fee_wei
        ))
    })?;

    let source = oracle::from_config(&config.vrf)?;
    let binding = source.binding(deployer);

    tracing::info!(
        entry_fee_wei = %entry_fee,
        coordinator = %binding.coordinator,
        subscription_id = binding.subscription_id,
        key_hash = %binding.key_hash,
        "Constructor parameters assembled"
    );

    Ok(vec![
        DynSolValue::Uint(entry_fee, 256),
        DynSolValue::Address(binding.coordinator),
        DynSolValue::Uint(U256::from(binding.subscription_id), 256),
        DynSolValue::FixedBytes(binding.key_hash, 32),
    ])
}
