//! Redis-backed verification record store
//!
//! Records are stored as their serialized bytes under the request id,
//! optionally prefixed: `{prefix}:{request_id}`. Without a prefix the key
//! layout is readable by older deployments that share the same database.

use async_trait::async_trait;
use pv_core::errors::StoreError;
use pv_core::services::VerificationStore;
use tracing::debug;

use crate::cache::RedisClient;

/// `VerificationStore` over a Redis connection
#[derive(Clone)]
pub struct RedisVerificationStore {
    /// Redis client for cache operations
    redis_client: RedisClient,
}

impl RedisVerificationStore {
    /// Create a new store on top of an existing client
    pub fn new(redis_client: RedisClient) -> Self {
        Self { redis_client }
    }

    fn record_key(&self, request_id: &str) -> String {
        self.redis_client.config().make_key(request_id)
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), StoreError> {
        let key = self.record_key(key);
        self.redis_client.set(&key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let key = self.record_key(key);
        Ok(self.redis_client.get(&key).await?)
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &[u8],
        ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        let key = self.record_key(key);
        Ok(self
            .redis_client
            .set_if_absent(&key, value, ttl_seconds)
            .await?)
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: &[u8],
        value: &[u8],
    ) -> Result<bool, StoreError> {
        let key = self.record_key(key);
        let replaced = self
            .redis_client
            .compare_and_set(&key, expected, value)
            .await?;
        if !replaced {
            debug!("Compare-and-set lost on key '{}'", key);
        }
        Ok(replaced)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        if self.redis_client.health_check().await? {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "Redis answered PING with an unexpected reply".to_string(),
            ))
        }
    }
}
