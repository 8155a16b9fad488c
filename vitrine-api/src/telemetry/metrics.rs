//! Prometheus Metrics Definitions
//!
//! Exposes a /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ServeError, ServeResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Global metrics instance - initialized once on first use
pub static METRICS: Lazy<ServeResult<ServeMetrics>> = Lazy::new(ServeMetrics::new);

/// The registered metrics, or `None` if registration failed.
pub fn metrics() -> Option<&'static ServeMetrics> {
    METRICS.as_ref().ok()
}

/// What an asset read was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Document,
    SubResource,
    Policy,
}

impl LoadKind {
    fn as_str(&self) -> &'static str {
        match self {
            LoadKind::Document => "document",
            LoadKind::SubResource => "sub_resource",
            LoadKind::Policy => "policy",
        }
    }
}

/// How an asset read ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Hit,
    Miss,
    Error,
}

impl LoadOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            LoadOutcome::Hit => "hit",
            LoadOutcome::Miss => "miss",
            LoadOutcome::Error => "error",
        }
    }

    /// Classify a load result.
    pub fn of<T>(result: &vitrine_core::VitrineResult<T>) -> Self {
        match result {
            Ok(_) => LoadOutcome::Hit,
            Err(err) if err.is_not_found() => LoadOutcome::Miss,
            Err(_) => LoadOutcome::Error,
        }
    }
}

#[derive(Clone)]
pub struct ServeMetrics {
    /// HTTP request counter - labels: method, route, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, route
    pub http_request_duration_seconds: HistogramVec,

    /// Asset reads - labels: kind, outcome
    pub asset_loads_total: CounterVec,

    /// Fallback responses - labels: status, outcome (mapped/generic)
    pub fallbacks_total: CounterVec,
}

impl ServeMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ServeResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "vitrine_http_requests_total",
                "Total number of HTTP requests",
                &["method", "route", "status"]
            )
            .map_err(|e| ServeError::internal_error(format!("Failed to register http_requests_total: {}", e)))?,

            http_request_duration_seconds: register_histogram_vec!(
                "vitrine_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "route"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| ServeError::internal_error(format!("Failed to register http_request_duration_seconds: {}", e)))?,

            asset_loads_total: register_counter_vec!(
                "vitrine_asset_loads_total",
                "Total asset reads against the backing store",
                &["kind", "outcome"]
            )
            .map_err(|e| ServeError::internal_error(format!("Failed to register asset_loads_total: {}", e)))?,

            fallbacks_total: register_counter_vec!(
                "vitrine_fallbacks_total",
                "Total responses served through the fallback chain",
                &["status", "outcome"]
            )
            .map_err(|e| ServeError::internal_error(format!("Failed to register fallbacks_total: {}", e)))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, route: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, route, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration_secs);
    }

    pub fn record_asset_load(&self, kind: LoadKind, outcome: LoadOutcome) {
        self.asset_loads_total
            .with_label_values(&[kind.as_str(), outcome.as_str()])
            .inc();
    }

    /// Record a fallback response; `mapped` when tenant content was served.
    pub fn record_fallback(&self, status: u16, mapped: bool) {
        let status_str = status.to_string();
        let outcome = if mapped { "mapped" } else { "generic" };
        self.fallbacks_total
            .with_label_values(&[status_str.as_str(), outcome])
            .inc();
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
pub async fn metrics_handler() -> impl IntoResponse {
    // Register before gathering so an idle origin still exports its families.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
