//! Placeholder source for chains without a real coordinator.
//!
//! Local development chains have no VRF infrastructure, so the contract is
//! constructed against stand-in values: the deployer's own address plays the
//! coordinator and the key hash is zero. Fulfillments are simulated by hand,
//! which mirrors how a local deployment is exercised.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, B256, U256};
use rand::Rng;

use crate::oracle::{decode_word, CoordinatorBinding, OracleError, RandomnessSource, RequestId};

/// Source of placeholder coordinator values and simulated fulfillments.
#[derive(Debug)]
pub struct LocalSource {
    subscription_id: u64,
    next_request: AtomicU64,
}

impl LocalSource {
    pub fn new(subscription_id: u64) -> Self {
        Self {
            subscription_id,
            next_request: AtomicU64::new(1),
        }
    }

    /// Produce a random fulfillment payload for a pending request, the way
    /// an operator would manually fulfill on a local chain.
    pub fn simulate_fulfillment(&self, request_id: RequestId) -> Vec<u8> {
        let mut word = [0u8; 32];
        rand::thread_rng().fill(&mut word[..]);
        tracing::debug!(request_id = %request_id, "Simulated fulfillment");
        word.to_vec()
    }
}

impl RandomnessSource for LocalSource {
    fn binding(&self, deployer: Address) -> CoordinatorBinding {
        // The deployer stands in for the coordinator; requestWinner cannot
        // complete against it without a manual fulfillment.
        CoordinatorBinding {
            coordinator: deployer,
            subscription_id: self.subscription_id,
            key_hash: B256::ZERO,
        }
    }

    fn request_value(&self, num_words: u32) -> RequestId {
        let id = RequestId(self.next_request.fetch_add(1, Ordering::SeqCst));
        tracing::debug!(request_id = %id, num_words, "Randomness requested");
        id
    }

    fn interpret_callback(&self, payload: &[u8]) -> Result<U256, OracleError> {
        decode_word(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_uses_deployer_as_coordinator() {
        let source = LocalSource::new(12345);
        let deployer = Address::repeat_byte(0x42);
        let binding = source.binding(deployer);

        assert_eq!(binding.coordinator, deployer);
        assert_eq!(binding.subscription_id, 12345);
        assert_eq!(binding.key_hash, B256::ZERO);
    }

    #[test]
    fn test_request_ids_are_sequential() {
        let source = LocalSource::new(1);
        assert_eq!(source.request_value(1), RequestId(1));
        assert_eq!(source.request_value(1), RequestId(2));
        assert_eq!(source.request_value(3), RequestId(3));
    }

    #[test]
    fn test_simulated_fulfillment_decodes() {
        let source = LocalSource::new(1);
        let request = source.request_value(1);
        let payload = source.simulate_fulfillment(request);
        // Any 32-byte payload interprets as a word; this one was random.
        source.interpret_callback(&payload).unwrap();
    }

    #[test]
    fn test_short_payload_rejected() {
        let source = LocalSource::new(1);
        let err = source.interpret_callback(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, OracleError::MalformedCallback(_)));
    }
}
