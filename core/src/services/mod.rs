//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    generate_check_code, generate_request_id, VerificationService, VerificationServiceConfig,
    VerificationStore, VerifyOutcome,
};
