//! Shared utilities and common types for the PhoneVerify server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - The standard API error body
//! - Utility functions (phone masking for logs)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, CorsConfig, Environment, LogFormat, LoggingConfig,
    ServerConfig, StoreBackend, StoreConfig, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
