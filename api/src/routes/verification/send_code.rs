use actix_web::{web, HttpResponse};

use crate::app::AppState;
use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::handlers::handle_domain_error;

/// Handler for POST /api/v1/send
///
/// Issues a verification code for the given number. The number is not
/// validated; delivering the code to it is the caller's concern.
///
/// # Request Body
///
/// ```json
/// { "number": "+15550001111" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "requestId": "k3j9x0ab-4fq2-...", "code": 4821 }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed JSON body
/// - 503 Service Unavailable: The record could not be stored
/// - 500 Internal Server Error: No unused request id could be generated
pub async fn send_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse {
    match state.verification_service.issue(&request.number).await {
        Ok(record) => HttpResponse::Created().json(SendCodeResponse {
            request_id: record.request_id,
            code: record.code,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
