use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;
    }

    let service = state::build_service(&config, db.clone()).await?;

    let state = AppState { config, db };

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api::routes(&state, service), &state.config.server)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against PostgreSQL
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        error_contract = ?state.config.error_contract,
        "Starting RAG API with production-ready shutdown (30s timeout)"
    );

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        close_postgres(state.db.clone(), "main"),
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("RAG API shutdown complete");
    Ok(())
}
