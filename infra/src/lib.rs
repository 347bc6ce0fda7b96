//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for PhoneVerify. It
//! provides the concrete record stores behind the core `VerificationStore`
//! contract.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: Redis client with retry logic and the Redis-backed store
//! - **Memory**: an in-process store for single-node deployments and tests
//!
//! `build_store` picks one according to `StoreConfig`.

use pv_core::errors::StoreError;

/// Cache module - Redis client and record store implementations
pub mod cache;

pub use cache::{build_store, MemoryVerificationStore, RedisClient, RedisVerificationStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
