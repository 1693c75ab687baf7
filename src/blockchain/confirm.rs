//! Confirmation polling for a submitted deployment.
//!
//! Fixed-interval receipt polls bounded by a wall-clock deadline. One poll is
//! one `eth_getTransactionReceipt`; after the first empty poll the node is
//! also asked whether it still knows the transaction at all, which separates
//! "not mined yet" from "evicted from the pool".

use std::time::{Duration, Instant};

use alloy::primitives::TxHash;
use tokio::time::interval;

use crate::blockchain::client::EvmClient;
use crate::blockchain::types::Confirmation;
use crate::config::schema::ConfirmationConfig;
use crate::pipeline::error::DeployError;

/// Poll until the transaction is included, dropped, or the deadline passes.
///
/// Returns a [`Confirmation`] only for a receipt with success status and a
/// contract address. A failure receipt is a revert; a missing transaction is
/// a drop; an expired deadline reports how many polls were made.
pub async fn wait_for_inclusion(
    client: &EvmClient,
    tx_hash: TxHash,
    config: &ConfirmationConfig,
) -> Result<Confirmation, DeployError> {
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let deadline = Duration::from_secs(config.deadline_secs);
    let started = Instant::now();

    let mut ticker = interval(poll_interval);
    let mut attempts: u32 = 0;

    loop {
        // First tick completes immediately, so the first poll happens right
        // after submission.
        ticker.tick().await;
        attempts += 1;

        if let Some(receipt) = client.transaction_receipt(tx_hash).await? {
            let block_number = receipt.block_number.unwrap_or_default();

            if !receipt.status() {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    block_number,
                    "Deployment transaction reverted"
                );
                return Err(DeployError::DeploymentReverted {
                    tx_hash,
                    block_number,
                });
            }

            let Some(contract_address) = receipt.contract_address else {
                return Err(DeployError::NoContractAddress(tx_hash));
            };

            tracing::info!(
                tx_hash = %tx_hash,
                contract_address = %contract_address,
                block_number,
                attempts,
                "Deployment confirmed"
            );
            return Ok(Confirmation {
                tx_hash,
                contract_address,
                block_number,
            });
        }

        tracing::debug!(tx_hash = %tx_hash, attempts, "Transaction pending");

        // Grace of one interval for propagation before treating an unknown
        // hash as evicted.
        if attempts > 1 && !client.transaction_known(tx_hash).await? {
            tracing::warn!(tx_hash = %tx_hash, attempts, "Transaction no longer known to node");
            return Err(DeployError::TransactionDropped(tx_hash));
        }

        let elapsed = started.elapsed();
        if elapsed >= deadline {
            return Err(DeployError::ConfirmationTimeout { attempts, elapsed });
        }
    }
}
