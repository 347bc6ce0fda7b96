//! CORS middleware configuration for cross-origin requests.
//!
//! Origins come from `CorsConfig`: an empty list (or `*`) accepts any
//! origin, otherwise only the listed origins are allowed.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use pv_shared::CorsConfig;

/// Creates a CORS middleware instance from configuration.
///
/// Only the methods and headers the API actually uses are allowed.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("Configuring CORS for any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|s| s.trim()) {
            if !origin.is_empty() {
                tracing::info!("Adding allowed origin: {}", origin);
                cors = cors.allowed_origin(origin);
            }
        }
    }

    cors
}
