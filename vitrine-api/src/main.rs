//! Vitrine origin server entry point.
//!
//! Reads configuration from the environment, opens the backing store and
//! serves until interrupted.

use axum::Router;
use vitrine_api::telemetry::init_logging;
use vitrine_api::{create_router, open_store, AppState, ServeConfig, ServeError, ServeResult};

#[tokio::main]
async fn main() -> ServeResult<()> {
    let config = ServeConfig::from_env()?;
    init_logging(config.log_format)?;

    let store = open_store(&config)?;
    let addr = config.bind_addr()?;
    tracing::info!(
        backend = store.backend_name(),
        path = %config.store_path.display(),
        ops_routes = config.ops_routes_enabled,
        "Opened asset store"
    );

    let app: Router = create_router(AppState::new(store, config));

    tracing::info!(%addr, "Starting Vitrine origin");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServeError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ServeError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
