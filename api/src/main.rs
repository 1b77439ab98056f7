use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sb_api::app::create_app;
use sb_api::config::ApiConfig;
use sb_api::directory::SeedUserDirectory;
use sb_api::routes::auth::AppState;
use sb_core::services::jwt::{JwtService, JwtServiceConfig};
use sb_infra::cache::{RedisClient, RedisRevocationStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Stockbase API server");

    // Load and validate configuration
    let config = ApiConfig::from_env();
    config
        .validate()
        .context("invalid authentication configuration")?;

    // Connect the revocation store
    let redis = RedisClient::new(config.cache.clone())
        .await
        .context("failed to connect to Redis")?;
    let store = Arc::new(RedisRevocationStore::new(redis));

    // Wire the JWT service
    let jwt_service = Arc::new(JwtService::new(
        store,
        JwtServiceConfig {
            secret: config.auth.jwt.secret.clone(),
            access_ttl_secs: config.auth.jwt.access_ttl_secs,
            refresh_ttl_secs: config.auth.jwt.refresh_ttl_secs,
        },
    ));

    // Credential-check collaborator (stands in for the user service)
    let user_directory = Arc::new(SeedUserDirectory::from_env());
    if user_directory.is_empty() {
        warn!("SEED_USERS is empty - every login will be rejected");
    }

    let app_state = web::Data::new(AppState::new(
        jwt_service,
        user_directory,
        config.auth.cookies.clone(),
    ));

    let bind_address = config.bind_address();
    info!(%bind_address, "server binding");

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await?;

    Ok(())
}
