//! Record store error types

use thiserror::Error;

/// Failures reported by a `VerificationStore` implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A conditional update kept losing to concurrent writers
    #[error("Concurrent update conflict on key {key}")]
    Conflict { key: String },

    /// A stored value could not be decoded as a verification record
    #[error("Corrupt record under key {key}: {message}")]
    Corrupt { key: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_store_unavailable_classification() {
        let unavailable = DomainError::from(StoreError::Unavailable("connection refused".into()));
        assert!(unavailable.is_store_unavailable());

        let conflict = DomainError::from(StoreError::Conflict { key: "k".into() });
        assert!(conflict.is_store_unavailable());

        let corrupt = DomainError::from(StoreError::Corrupt {
            key: "k".into(),
            message: "eof".into(),
        });
        assert!(!corrupt.is_store_unavailable());

        let internal = DomainError::Internal { message: "x".into() };
        assert!(!internal.is_store_unavailable());
    }

    #[test]
    fn test_display() {
        let err = StoreError::Unavailable("timeout".into());
        assert_eq!(err.to_string(), "Store unavailable: timeout");

        let err = DomainError::from(StoreError::Conflict { key: "abc".into() });
        assert_eq!(err.to_string(), "Concurrent update conflict on key abc");
    }
}
