//! Products API - product catalog and inventory REST server

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres;
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
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");
    let db = postgres::connect_from_config_with_retry(config.postgres.clone(), None).await?;
    info!("Successfully connected to PostgreSQL");

    if config.run_migrations {
        postgres::run_migrations::<Migrator>(&db, config.app.name).await?;
    }

    let state = AppState {
        config: config.clone(),
        db,
    };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes)?
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.db.clone()));

    info!(
        "Starting Products API on port {}",
        state.config.server.port
    );

    create_production_app(
        router,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing PostgreSQL pool");
            if let Err(e) = state.db.close().await {
                tracing::warn!(error = %e, "Failed to close PostgreSQL pool");
            }
            info!("PostgreSQL connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
