//! Application state and factory
//!
//! This module provides the factory for the Actix-web application. The
//! server binary and the integration tests build the app the same way.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Condition,
    web, App, Error, HttpResponse,
};
use pv_core::services::{VerificationService, VerificationStore};
use pv_shared::{error_codes, CorsConfig, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::json_config;
use crate::middleware::cors::create_cors;
use crate::routes::verification::{send_code, verify_code};

/// Application state that holds shared services
pub struct AppState {
    pub verification_service: Arc<VerificationService<dyn VerificationStore>>,
}

impl AppState {
    pub fn new(verification_service: Arc<VerificationService<dyn VerificationStore>>) -> Self {
        Self {
            verification_service,
        }
    }
}

/// Create and configure the application
pub fn create_app(
    app_state: web::Data<AppState>,
    cors_config: &CorsConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = Condition::new(cors_config.enabled, create_cors(cors_config));

    App::new()
        .app_data(app_state)
        .app_data(json_config())
        // The last wrap is outermost, so CORS runs before the request span opens
        .wrap(TracingLogger::default())
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .route("/send", web::post().to(send_code))
                .route("/verify/", web::post().to(verify_code))
                .route("/verify", web::post().to(verify_code))
                .route("/", web::get().to(api_documentation)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_status = match state.verification_service.store_health().await {
        Ok(()) => "up",
        Err(error) => {
            tracing::warn!(error = %error, "Store health check failed");
            "down"
        }
    };

    let body = serde_json::json!({
        "status": if store_status == "up" { "healthy" } else { "degraded" },
        "store": store_status,
        "service": "phone-verify-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if store_status == "up" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

/// API documentation endpoint
async fn api_documentation(state: web::Data<AppState>) -> HttpResponse {
    let config = state.verification_service.config();
    HttpResponse::Ok().json(serde_json::json!({
        "message": "PhoneVerify API v1",
        "endpoints": {
            "health": "/health",
            "send": {
                "path": "/api/v1/send",
                "method": "POST",
                "request_body": { "number": "string" },
                "responses": {
                    "201": "{ requestId, code }",
                    "400": "Malformed body",
                    "503": "Store unavailable"
                }
            },
            "verify": {
                "path": "/api/v1/verify/",
                "method": "POST",
                "request_body": { "requestId": "string", "code": "integer" },
                "responses": {
                    "200": "Unix timestamp of the verification",
                    "400": "Code expired or malformed body",
                    "401": "Code mismatch",
                    "429": "Attempts exceeded",
                    "503": "Store unavailable"
                }
            }
        },
        "verification": {
            "code_length": config.code_length,
            "ttl_support": config.ttl_support,
            "duration_seconds": config.duration_seconds,
        }
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
