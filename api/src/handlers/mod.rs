//! Error handling shared by the route handlers

pub mod error;

pub use error::{handle_domain_error, json_config};
