//! Axum Middleware for HTTP Request Tracing and Metrics

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::metrics;

/// Route label for metrics and spans.
///
/// Tenant paths collapse to `/{tenant}/*` to keep Prometheus label
/// cardinality bounded.
pub fn normalize_route(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/health/ping" => "/health/ping",
        "/health/live" => "/health/live",
        "/health/ready" => "/health/ready",
        "/metrics" => "/metrics",
        _ => "/{tenant}/*",
    }
}

/// Wraps every request in an `http_request` span, records Prometheus
/// metrics and logs completion.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = normalize_route(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = route,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Some(metrics) = metrics() {
        metrics.record_http_request(method.as_str(), route, status.as_u16(), duration.as_secs_f64());
    }

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tenant_paths() {
        assert_eq!(normalize_route("/acme/index.html"), "/{tenant}/*");
        assert_eq!(normalize_route("/acme"), "/{tenant}/*");
        assert_eq!(normalize_route("/health/other"), "/{tenant}/*");
    }

    #[test]
    fn test_normalize_ops_paths() {
        assert_eq!(normalize_route("/health/ready"), "/health/ready");
        assert_eq!(normalize_route("/metrics"), "/metrics");
        assert_eq!(normalize_route("/"), "/");
    }
}
