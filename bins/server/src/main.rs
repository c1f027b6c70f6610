//! fxgate API Server
//!
//! Main entry point: loads configuration, migrates the database, starts the
//! rate refresh loop and serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxgate_api::{AppState, create_router};
use fxgate_core::auth::SessionAuthenticator;
use fxgate_core::currency::{ConversionEngine, spawn_refresh_loop};
use fxgate_db::migration::Migrator;
use fxgate_db::{CredentialRepository, RateSnapshotRepository, connect_with};
use fxgate_shared::providers::ProviderKind;
use fxgate_shared::{AppConfig, JwtService, RateProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fxgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Connect to database and apply pending migrations
    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    // Session authenticator
    let jwt_service = JwtService::new(config.jwt.to_jwt_config());
    let auth = SessionAuthenticator::new(
        Arc::new(CredentialRepository::new(db.clone())),
        jwt_service,
    );

    // Conversion engine over the configured provider
    let provider = RateProvider::new(
        ProviderKind::from_name(&config.rates.provider),
        config.rates.fetch_timeout(),
        config.rates.base_url.as_deref(),
    )
    .context("failed to build rate provider")?;
    info!(provider = provider.name(), "Rate provider configured");
    let engine = Arc::new(ConversionEngine::new(
        Arc::new(provider),
        Arc::new(RateSnapshotRepository::new(db)),
    ));

    let refresh_task = spawn_refresh_loop(
        engine.clone(),
        config.rates.default_base.clone(),
        config.rates.refresh_interval(),
    );

    // Create router
    let state = AppState::new(Arc::new(auth), engine, &config.rates.default_base);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh_task.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
