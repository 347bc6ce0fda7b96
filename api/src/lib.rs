//! HTTP transport for PhoneVerify
//!
//! Exposes the library pieces of the API binary so that integration tests
//! can assemble the same application the server runs.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
