//! # PhoneVerify Core
//!
//! Domain layer for the PhoneVerify backend: the verification record, request
//! id and code generation, the record store contract and the issuance and
//! verification policy built on top of it.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
