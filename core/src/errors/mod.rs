//! Domain-specific error types and error handling.

mod types;

pub use types::StoreError;

use thiserror::Error;

/// Core domain errors.
///
/// Verification policy results (mismatch, expiry, lockout) are not errors;
/// they are reported through `VerifyOutcome`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Whether the failure is the backing store being unreachable or
    /// contended, as opposed to a bug or corrupt data
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            DomainError::Store(StoreError::Unavailable(_) | StoreError::Conflict { .. })
        )
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Internal {
            message: format!("Failed to serialize verification record: {}", err),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
