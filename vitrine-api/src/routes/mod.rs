//! Router assembly.
//!
//! Operational routes (`/health/*`, `/metrics`) are registered explicitly
//! and shadow tenants of the same name only on those exact paths. Every
//! other request falls through to the tenant dispatcher.

pub mod health;
pub mod serve;

use axum::{middleware::from_fn, routing::get, Router};

use crate::headers::with_static_headers;
use crate::state::AppState;
use crate::telemetry::{metrics_handler, observability_middleware};

/// Build the full origin router.
pub fn create_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new();

    if state.config.ops_routes_enabled {
        router = router
            .nest("/health", health::create_router())
            .route("/metrics", get(metrics_handler));
    }

    let router = router.fallback(serve::serve).with_state(state);

    with_static_headers(router).layer(from_fn(observability_middleware))
}
