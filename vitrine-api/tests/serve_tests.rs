//! HTTP-level tests for the origin router.
//!
//! Each test builds the full router over an in-memory store seeded with the
//! sample bundle and drives it with `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt; // for `oneshot`
use vitrine_api::{create_router, AppState, ServeConfig};
use vitrine_storage::{AssetStore, StoreError};
use vitrine_test_utils::fixtures::{
    cache_policy_document, fallback_map_document, shared_store, PNG_BYTES,
};

// ============================================================================
// HELPERS
// ============================================================================

fn app_with(store: Arc<dyn AssetStore>, config: ServeConfig) -> Router {
    create_router(AppState::new(store, config))
}

fn app(extra: Vec<(&str, Vec<u8>)>) -> Router {
    app_with(shared_store(extra), ServeConfig::default())
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(app: Router, request: Request<Body>) -> Reply {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    Reply {
        status,
        headers,
        body,
    }
}

async fn get(app: Router, uri: &str) -> Reply {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Store whose every read fails.
struct FailingStore;

#[async_trait]
impl AssetStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Transaction("disk on fire".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Store that answers after a fixed delay.
struct SlowStore(Duration);

#[async_trait]
impl AssetStore for SlowStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        tokio::time::sleep(self.0).await;
        Ok(Some(b"<p>late</p>".to_vec()))
    }

    fn backend_name(&self) -> &'static str {
        "slow"
    }
}

// ============================================================================
// PATH RESOLUTION
// ============================================================================

#[tokio::test]
async fn test_tenant_root_serves_assembled_index() {
    let reply = get(app(vec![]), "/acme/").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header(header::CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(reply.header(header::CACHE_CONTROL), Some("no-cache"));
    assert!(reply.header(header::ETAG).is_some());

    let html = reply.text();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<html lang=\"en\">"));
    assert!(html.contains("<body class=\"home\">"));
    assert!(html.contains("/acme/img/bg.png"));
    assert!(html.contains("fetch(\"/acme/data.json\")"));
    assert!(!html.contains("href=\"css/site.css\""));
}

#[tokio::test]
async fn test_scripts_keep_head_then_body_order() {
    let html = get(app(vec![]), "/acme/").await.text();

    let boot = html.find("window.boot = 1").unwrap();
    let app_js = html.find("fetch(\"/acme/data.json\")").unwrap();
    let cdn = html.find("https://cdn.example.com/lib.js").unwrap();
    let heading = html.find("<h1>Acme</h1>").unwrap();

    assert!(heading < boot);
    assert!(boot < app_js);
    assert!(app_js < cdn);
    assert!(!html.contains("missing.js"));
}

#[tokio::test]
async fn test_clean_url_and_directory_index() {
    let about = get(app(vec![]), "/acme/about").await;
    assert_eq!(about.status, StatusCode::OK);
    assert!(about.text().contains("<p>About Acme</p>"));

    let docs = get(app(vec![]), "/acme/docs/").await;
    assert_eq!(docs.status, StatusCode::OK);
    assert!(docs.text().contains("<p>Docs</p>"));
}

#[tokio::test]
async fn test_bare_tenant_redirects() {
    let reply = get(app(vec![]), "/acme").await;
    assert_eq!(reply.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(reply.header(header::LOCATION), Some("/acme/"));

    let reply = get(app(vec![]), "/acme?ref=mail").await;
    assert_eq!(reply.header(header::LOCATION), Some("/acme/?ref=mail"));
}

#[tokio::test]
async fn test_root_is_bad_request() {
    let reply = get(app(vec![]), "/").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.text(), "Bad Request");
    assert_eq!(reply.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
}

#[tokio::test]
async fn test_traversal_is_bad_request() {
    let reply = get(app(vec![]), "/acme/%2e%2e/other/index.html").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// CONTENT TYPES, VALIDATORS AND CACHE POLICY
// ============================================================================

#[tokio::test]
async fn test_binary_asset_passes_through() {
    let reply = get(app(vec![]), "/acme/img/logo.png").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.header(header::CONTENT_TYPE), Some("image/png"));
    assert_eq!(reply.body, PNG_BYTES);
}

#[tokio::test]
async fn test_if_none_match_yields_not_modified() {
    let first = get(app(vec![]), "/acme/data.json").await;
    let etag = first.header(header::ETAG).unwrap().to_string();
    assert_eq!(first.header(header::CONTENT_TYPE), Some("application/json"));

    let request = Request::builder()
        .uri("/acme/data.json")
        .header(header::IF_NONE_MATCH, etag.as_str())
        .body(Body::empty())
        .unwrap();
    let second = send(app(vec![]), request).await;

    assert_eq!(second.status, StatusCode::NOT_MODIFIED);
    assert!(second.body.is_empty());
    assert_eq!(second.header(header::ETAG), Some(etag.as_str()));

    let request = Request::builder()
        .uri("/acme/data.json")
        .header(header::IF_NONE_MATCH, "\"stale\"")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(app(vec![]), request).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_etag_is_stable_across_requests() {
    let a = get(app(vec![]), "/acme/").await;
    let b = get(app(vec![]), "/acme/").await;
    assert_eq!(a.header(header::ETAG), b.header(header::ETAG));
}

#[tokio::test]
async fn test_tenant_cache_policy() {
    let extra = || vec![("_cache.json", cache_policy_document())];

    let js = get(app(extra()), "/acme/js/app.js").await;
    assert_eq!(
        js.header(header::CACHE_CONTROL),
        Some("public, max-age=31536000, immutable")
    );

    let txt = get(app(extra()), "/acme/notes.txt").await;
    assert_eq!(txt.header(header::CACHE_CONTROL), Some("public, max-age=30"));
    assert_eq!(txt.header(header::CONTENT_TYPE), Some("application/octet-stream"));
}

#[tokio::test]
async fn test_builtin_cache_policy() {
    let png = get(app(vec![]), "/acme/img/logo.png").await;
    assert_eq!(
        png.header(header::CACHE_CONTROL),
        Some("public, max-age=31536000, immutable")
    );

    let txt = get(app(vec![]), "/acme/notes.txt").await;
    assert_eq!(txt.header(header::CACHE_CONTROL), Some("no-cache"));
}

#[tokio::test]
async fn test_malformed_policy_uses_builtin() {
    let reply = get(app(vec![("_cache.json", b"{oops".to_vec())]), "/acme/css/site.css").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.header(header::CACHE_CONTROL),
        Some("public, max-age=31536000, immutable")
    );
}

// ============================================================================
// FALLBACK CHAIN
// ============================================================================

#[tokio::test]
async fn test_missing_asset_without_map_is_generic_404() {
    let reply = get(app(vec![]), "/acme/missing.html").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text(), "Not Found");
    assert_eq!(reply.header(header::CACHE_CONTROL), Some("no-cache"));
    assert_eq!(reply.header(header::X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
}

#[tokio::test]
async fn test_missing_asset_with_map_serves_assembled_target() {
    let reply = get(
        app(vec![("_fallback.json", fallback_map_document())]),
        "/acme/missing.html",
    )
    .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.header(header::CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(reply.header(header::CACHE_CONTROL), Some("no-cache"));
    let html = reply.text();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<p>Nothing here</p>"));
}

#[tokio::test]
async fn test_missing_fallback_target_degrades_to_generic() {
    let map = br#"{"404": "/gone.html"}"#.to_vec();
    let reply = get(app(vec![("_fallback.json", map)]), "/acme/missing.html").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text(), "Not Found");
}

#[tokio::test]
async fn test_undecodable_document_serves_mapped_500_target() {
    let extra = vec![
        ("broken.html", vec![0xff, 0xfe, 0xfd]),
        ("oops.html", b"<p>Something broke</p>".to_vec()),
        ("_fallback.json", br#"{"500": "oops.html"}"#.to_vec()),
    ];
    let reply = get(app(extra), "/acme/broken.html").await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.header(header::CONTENT_TYPE), Some("text/html; charset=utf-8"));
    assert_eq!(reply.header(header::CACHE_CONTROL), Some("no-cache"));
    let html = reply.text();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<body><p>Something broke</p></body>"));
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let reply = get(app_with(Arc::new(FailingStore), ServeConfig::default()), "/acme/").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.text(), "Internal Server Error");
    assert_eq!(reply.header(header::X_FRAME_OPTIONS), Some("DENY"));
}

#[tokio::test]
async fn test_timeout_routes_to_500() {
    let config = ServeConfig {
        request_timeout: Duration::from_millis(20),
        ..ServeConfig::default()
    };
    let store = Arc::new(SlowStore(Duration::from_millis(200)));
    let reply = get(app_with(store, config), "/acme/").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.text(), "Internal Server Error");
}

// ============================================================================
// METHODS AND HEADERS
// ============================================================================

#[tokio::test]
async fn test_head_strips_body() {
    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/acme/data.json")
        .body(Body::empty())
        .unwrap();
    let reply = send(app(vec![]), request).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body.is_empty());
    assert_eq!(reply.header(header::CONTENT_TYPE), Some("application/json"));
    assert!(reply.header(header::ETAG).is_some());
}

#[tokio::test]
async fn test_options_is_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/acme/anything")
        .body(Body::empty())
        .unwrap();
    let reply = send(app(vec![]), request).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(reply.body.is_empty());
    assert_eq!(reply.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert_eq!(
        reply.header(header::ACCESS_CONTROL_ALLOW_METHODS),
        Some("GET, HEAD, OPTIONS")
    );
    assert_eq!(
        reply.header(header::ACCESS_CONTROL_ALLOW_HEADERS),
        Some("Content-Type, If-None-Match")
    );
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/acme/")
        .body(Body::empty())
        .unwrap();
    let reply = send(app(vec![]), request).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(reply.header(header::ALLOW), Some("GET, HEAD, OPTIONS"));
}

#[tokio::test]
async fn test_hardening_headers_on_success() {
    let reply = get(app(vec![]), "/acme/js/app.js").await;
    assert_eq!(reply.header(header::CONTENT_TYPE), Some("text/javascript"));
    assert_eq!(reply.header(header::X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
    assert_eq!(reply.header(header::X_FRAME_OPTIONS), Some("DENY"));
    assert_eq!(reply.header(header::REFERRER_POLICY), Some("no-referrer"));
    assert_eq!(reply.header(header::VARY), Some("Accept-Encoding"));
    assert_eq!(reply.header(header::ACCEPT_RANGES), Some("bytes"));
}

// ============================================================================
// OPERATIONAL ROUTES
// ============================================================================

#[tokio::test]
async fn test_health_routes() {
    let ping = get(app(vec![]), "/health/ping").await;
    assert_eq!(ping.status, StatusCode::OK);
    assert_eq!(ping.text(), "pong");

    let ready = get(app(vec![]), "/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&ready.body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["details"]["store"]["backend"], "memory");
}

#[tokio::test]
async fn test_readiness_reports_store_failure() {
    let reply = get(
        app_with(Arc::new(FailingStore), ServeConfig::default()),
        "/health/ready",
    )
    .await;
    assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
    assert_eq!(json["status"], "unhealthy");
}

#[tokio::test]
async fn test_metrics_route() {
    let reply = get(app(vec![]), "/metrics").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn test_ops_routes_disabled_fall_through_to_tenant() {
    let config = ServeConfig {
        ops_routes_enabled: false,
        ..ServeConfig::default()
    };
    let store = shared_store(vec![]);
    let reply = get(app_with(store, config), "/health/ping").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.text(), "Not Found");
}

#[tokio::test]
async fn test_tenant_named_health_is_served_off_ops_paths() {
    let store: Arc<dyn AssetStore> = Arc::new(vitrine_storage::InMemoryAssetStore::with_assets([(
        "health/index.html",
        b"<p>health tenant</p>".to_vec(),
    )]));
    let reply = get(app_with(store, ServeConfig::default()), "/health/").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.text().contains("health tenant"));
}
