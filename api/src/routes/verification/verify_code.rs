use actix_web::{http::StatusCode, web, HttpResponse};
use pv_core::domain::entities::MAX_ATTEMPTS;
use pv_core::services::VerifyOutcome;
use pv_shared::{error_codes, ErrorResponse};

use crate::app::AppState;
use crate::dto::VerifyCodeRequest;
use crate::handlers::handle_domain_error;

/// Handler for POST /api/v1/verify/
///
/// # Request Body
///
/// ```json
/// { "requestId": "k3j9x0ab-4fq2-...", "code": 4821 }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// The verification time as a JSON number of Unix seconds, e.g. `1760601600`.
///
/// ## Errors
/// - 401 Unauthorized: `CODE_MISMATCH`, wrong code or unknown request id
/// - 400 Bad Request: `VERIFICATION_CODE_EXPIRED`, or a malformed body
/// - 429 Too Many Requests: `ATTEMPTS_EXCEEDED`, the code is locked for good
/// - 503 Service Unavailable: The store could not be reached
/// - 500 Internal Server Error: The stored record is corrupt
pub async fn verify_code(
    state: web::Data<AppState>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    match state
        .verification_service
        .verify(&request.request_id, request.code)
        .await
    {
        Ok(outcome) => outcome_response(outcome),
        Err(error) => handle_domain_error(&error),
    }
}

/// Map a verification outcome to its response.
///
/// Each failure has its own status and error code so clients can tell
/// "try again" from "request a new code" from "locked".
pub fn outcome_response(outcome: VerifyOutcome) -> HttpResponse {
    match outcome {
        VerifyOutcome::Accepted { verified_at } => {
            HttpResponse::Ok().json(verified_at.timestamp())
        }
        VerifyOutcome::CodeMismatch => HttpResponse::build(StatusCode::UNAUTHORIZED).json(
            ErrorResponse::new(error_codes::CODE_MISMATCH, "Verification code does not match"),
        ),
        VerifyOutcome::Expired => HttpResponse::build(StatusCode::BAD_REQUEST).json(
            ErrorResponse::new(error_codes::VERIFICATION_CODE_EXPIRED, "code expired"),
        ),
        VerifyOutcome::AttemptsExceeded => HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
            .json(
                ErrorResponse::new(
                    error_codes::ATTEMPTS_EXCEEDED,
                    format!("More than {} attempts. Code disabled", MAX_ATTEMPTS),
                )
                .add_detail("max_attempts", MAX_ATTEMPTS),
            ),
    }
}
