use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use cv_api::bootstrap::verification_service;
use cv_api::middleware::create_cors;
use cv_api::telemetry::init_tracing;
use cv_api::{create_app, AppState};
use cv_infra::identity::JwtIdentityVerifier;
use cv_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    tracing::info!(
        event = "server_starting",
        environment = %config.environment,
        challenge_store = ?config.cache.store,
        sms_providers = ?config.sms.providers,
        "Starting contact verification API"
    );
    if config.environment.is_production() && config.identity.jwt_secret == "change-me-in-production" {
        anyhow::bail!("IDENTITY_JWT_SECRET must be set in production");
    }

    let verification = verification_service(&config).await?;
    let identity = Arc::new(JwtIdentityVerifier::new(&config.identity));
    let state = web::Data::new(AppState::new(verification, identity));

    let environment = config.environment;
    let bind_address = config.server.bind_address();
    tracing::info!(event = "server_binding", address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || {
        create_app(state.clone())
            .wrap(create_cors(environment))
            .wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    tracing::info!(event = "server_stopped", "Server stopped");
    Ok(())
}
