use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
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
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let state = AppState::new(config);

    if state.config.catalog.seed_demo {
        state.catalog.seed_demo_item().await?;
    }

    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!(
        app = state.config.app.name,
        version = state.config.app.version,
        "Starting lost and found API"
    );

    let catalog = state.catalog.clone();
    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        match catalog.count_items().await {
            Ok(count) => info!(items = count, "Discarding in-memory catalog"),
            Err(e) => tracing::warn!("Could not read catalog size at shutdown: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Lost and found API shutdown complete");
    Ok(())
}
