//! Vitrine Telemetry - Observability Infrastructure
//!
//! Structured logging through `tracing` and Prometheus metrics for the origin.

pub mod logging;
pub mod metrics;
pub mod middleware;

pub use logging::init_logging;
pub use metrics::{metrics, metrics_handler, ServeMetrics, METRICS};
pub use middleware::observability_middleware;
