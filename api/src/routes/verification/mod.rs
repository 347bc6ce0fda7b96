//! Verification route handlers
//!
//! - `POST /api/v1/send` issues a code for a number
//! - `POST /api/v1/verify/` checks a submitted code

pub mod send_code;
pub mod verify_code;

pub use send_code::send_code;
pub use verify_code::verify_code;
