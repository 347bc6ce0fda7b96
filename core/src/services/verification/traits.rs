//! Trait for the verification record store

use async_trait::async_trait;

use crate::errors::StoreError;

/// Key-value store holding serialized verification records.
///
/// Values are opaque bytes. A `ttl_seconds` of 0 means the value never
/// expires. Implementations must make `set_if_absent` and
/// `compare_and_set` atomic with respect to every other operation on the
/// same key; the verifier relies on this to count attempts without lost
/// updates.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Store a value unconditionally
    async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError>;

    /// Fetch a value, `None` if absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store a value only if the key does not exist yet.
    ///
    /// Returns `false` without writing when the key is taken.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &[u8],
        ttl_seconds: u64,
    ) -> Result<bool, StoreError>;

    /// Replace the value only if it still equals `expected` byte for byte.
    ///
    /// Any remaining TTL on the key is kept. Returns `false` without
    /// writing when the key is missing or holds something else.
    async fn compare_and_set(
        &self,
        key: &str,
        expected: &[u8],
        value: &[u8],
    ) -> Result<bool, StoreError>;

    /// Check the store is reachable
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
