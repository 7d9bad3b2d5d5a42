use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible call so startup errors are rendered with span traces
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;

    let state = AppState { config, db };

    let api_routes = api::routes(&state);
    let app = create_router::<openapi::ApiDoc>(api_routes, &state.config.cors)?
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        app = state.config.app.name,
        version = state.config.app.version,
        port = state.config.server.port,
        "Starting eshop API"
    );

    let db = state.db.clone();
    create_production_app(app, &state.config.server, async move {
        info!("Shutting down: closing database connections");
        if let Err(e) = db.close().await {
            tracing::error!("Error closing database: {}", e);
        } else {
            info!("Database connections closed");
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Eshop API shutdown complete");
    Ok(())
}
