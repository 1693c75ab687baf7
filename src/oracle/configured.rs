//! Source backed by a real, externally managed coordinator.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, B256, U256};

use crate::oracle::{decode_word, CoordinatorBinding, OracleError, RandomnessSource, RequestId};

/// Coordinator values taken verbatim from configuration, for chains where a
/// subscription already exists.
#[derive(Debug)]
pub struct ConfiguredSource {
    coordinator: Address,
    subscription_id: u64,
    key_hash: B256,
    next_request: AtomicU64,
}

impl ConfiguredSource {
    pub fn new(coordinator: Address, subscription_id: u64, key_hash: B256) -> Self {
        Self {
            coordinator,
            subscription_id,
            key_hash,
            next_request: AtomicU64::new(1),
        }
    }
}

impl RandomnessSource for ConfiguredSource {
    fn binding(&self, _deployer: Address) -> CoordinatorBinding {
        CoordinatorBinding {
            coordinator: self.coordinator,
            subscription_id: self.subscription_id,
            key_hash: self.key_hash,
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
    fn test_binding_ignores_deployer() {
        let coordinator = Address::repeat_byte(0xb3);
        let key_hash = B256::repeat_byte(0x2e);
        let source = ConfiguredSource::new(coordinator, 99, key_hash);

        let binding = source.binding(Address::repeat_byte(0x42));
        assert_eq!(binding.coordinator, coordinator);
        assert_eq!(binding.subscription_id, 99);
        assert_eq!(binding.key_hash, key_hash);
    }
}
