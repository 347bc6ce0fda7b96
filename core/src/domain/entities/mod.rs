//! Domain entities representing core business objects.

pub mod verification_record;


pub use verification_record::{VerificationRecord, MAX_ATTEMPTS};
