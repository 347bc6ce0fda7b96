use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use pv_api::{create_app, telemetry, AppState};
use pv_core::services::{VerificationService, VerificationServiceConfig};
use pv_infra::build_store;
use pv_shared::{AppConfig, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    telemetry::init(&config.logging).context("Failed to initialize logging")?;

    info!(environment = %config.environment, "Starting PhoneVerify API Server");
    if config.environment.is_production() && config.store.backend == StoreBackend::Memory {
        warn!("In-memory store in production: records are lost on restart and not shared between instances");
    }

    let store = build_store(&config.store)
        .await
        .context("Failed to initialize verification store")?;

    let service_config = VerificationServiceConfig::from(&config.verification);
    info!(
        code_length = service_config.code_length,
        ttl_support = service_config.ttl_support,
        duration_seconds = service_config.duration_seconds,
        "Verification policy loaded"
    );

    let verification_service = Arc::new(VerificationService::new(store, service_config));
    let app_state = web::Data::new(AppState::new(verification_service));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let cors_config = config.cors.clone();
    let mut server = HttpServer::new(move || create_app(app_state.clone(), &cors_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
