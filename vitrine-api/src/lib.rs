//! Vitrine API - Multi-Tenant Static Origin
//!
//! Serves tenant bundles under `/{tenant}/` over Axum: path resolution,
//! HTML assembly, cache policy, validators and the per-tenant fallback
//! chain, plus health and metrics routes for operators.

pub mod config;
pub mod error;
pub mod fallback;
pub mod headers;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{LogFormat, ServeConfig, StoreKind};
pub use error::{ErrorCode, ServeError, ServeResult};
pub use routes::create_router;
pub use state::{open_store, AppState};
