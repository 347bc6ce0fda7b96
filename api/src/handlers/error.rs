use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse};
use pv_core::errors::{DomainError, StoreError};
use pv_shared::{error_codes, ErrorResponse};

/// Build a JSON error response
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(code, message))
}

/// Convert a domain error into an HTTP response.
///
/// An unreachable or contended store is a 503 so that clients retry; a
/// corrupt record or an internal failure is a 500.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    if error.is_store_unavailable() {
        tracing::warn!(error = %error, "Verification store unavailable");
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::STORE_UNAVAILABLE,
            "Verification store is temporarily unavailable",
        );
    }

    match error {
        DomainError::Store(StoreError::Corrupt { key, .. }) => {
            tracing::error!(error = %error, key = %key, "Corrupt verification record");
        }
        _ => {
            tracing::error!(error = %error, "Internal error");
        }
    }

    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        error_codes::INTERNAL_ERROR,
        "An internal error occurred",
    )
}

/// JSON extractor configuration that reports malformed bodies as a 400
/// with the standard error body
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        let response = error_response(
            StatusCode::BAD_REQUEST,
            error_codes::BAD_REQUEST,
            format!("Invalid request body: {}", err),
        );
        InternalError::from_response(err, response).into()
    })
}
