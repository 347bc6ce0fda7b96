//! Record store implementations
//!
//! This module provides the verification record stores: a Redis-backed one
//! with connection retry logic, and an in-process one.

pub mod memory_store;
pub mod redis_client;
pub mod verification_store;


use std::sync::Arc;

use pv_core::services::VerificationStore;
use pv_shared::config::{StoreBackend, StoreConfig};
use tracing::info;

use crate::InfrastructureError;

pub use memory_store::MemoryVerificationStore;
pub use redis_client::RedisClient;
pub use verification_store::RedisVerificationStore;

// Re-export commonly used types
pub use pv_shared::config::cache::CacheConfig;

/// Create the record store selected by `config`.
///
/// The Redis backend connects eagerly, so an unreachable server fails
/// here rather than on the first request.
pub async fn build_store(
    config: &StoreConfig,
) -> Result<Arc<dyn VerificationStore>, InfrastructureError> {
    match config.backend {
        StoreBackend::Redis => {
            let client = RedisClient::new(config.redis.clone()).await?;
            info!("Using Redis verification store");
            Ok(Arc::new(RedisVerificationStore::new(client)))
        }
        StoreBackend::Memory => {
            info!("Using in-memory verification store; records are lost on restart");
            Ok(Arc::new(MemoryVerificationStore::new()))
        }
    }
}
