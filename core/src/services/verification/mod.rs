//! Verification service module for phone-bound one-time codes
//!
//! This module provides the complete code workflow:
//! - Request id and code generation
//! - Issuing a record and persisting it to the store
//! - Verifying a submitted code with expiry and attempt-limit policy
//! - Lost-update-free attempt counting through conditional store writes

mod config;
mod generator;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use generator::{generate_check_code, generate_request_id, REQUEST_ID_LENGTH};
pub use service::VerificationService;
pub use traits::VerificationStore;
pub use types::VerifyOutcome;
