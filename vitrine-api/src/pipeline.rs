//! Serving pipeline: load, assemble, validate, attach cache policy.
//!
//! Shared by the dispatcher and the fallback chain so a fallback target is
//! served exactly like a requested asset.

use async_trait::async_trait;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use vitrine_core::{
    builtin_directive, etag, policy_for, AssetContent, AssetPath, Assembler, CacheDirective,
    ContentType, FallbackMap, LoadMode, SubResourceLoader, Tenant, VitrineResult,
};
use vitrine_storage::AssetLoader;

use crate::error::generic_body;
use crate::state::AppState;
use crate::telemetry::metrics::{metrics, LoadKind, LoadOutcome};

/// Bytes ready to send, with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAsset {
    pub content_type: ContentType,
    pub body: Vec<u8>,
}

fn record_load(kind: LoadKind, outcome: LoadOutcome) {
    if let Some(metrics) = metrics() {
        metrics.record_asset_load(kind, outcome);
    }
}

/// Sub-resource loader that counts its reads.
struct MeteredLoader<'a>(&'a AssetLoader);

#[async_trait]
impl SubResourceLoader for MeteredLoader<'_> {
    async fn load_text(&self, tenant: &Tenant, path: &str) -> VitrineResult<String> {
        let result = self.0.load_text(tenant, path).await;
        record_load(LoadKind::SubResource, LoadOutcome::of(&result));
        result
    }
}

/// Load an asset; HTML is assembled, everything else is passed through as
/// raw bytes.
pub async fn render_asset(state: &AppState, asset: &AssetPath) -> VitrineResult<RenderedAsset> {
    let content_type = asset.content_type();
    let mode = if content_type.is_html() {
        LoadMode::Text
    } else {
        LoadMode::Binary
    };

    let result = state.loader.load(&asset.tenant, &asset.path, mode).await;
    record_load(LoadKind::Document, LoadOutcome::of(&result));

    let body = match result? {
        AssetContent::Text(html) if content_type.is_html() => {
            let loader = MeteredLoader(&state.loader);
            Assembler::new(&asset.tenant, &loader)
                .assemble(&html)
                .await
                .into_bytes()
        }
        content => content.into_bytes(),
    };

    Ok(RenderedAsset { content_type, body })
}

/// Read an optional per-tenant document. Store failures count as absence.
async fn load_document(state: &AppState, tenant: &Tenant, name: &str) -> Option<Vec<u8>> {
    match state.loader.load_optional(tenant, name).await {
        Ok(Some(document)) => {
            record_load(LoadKind::Policy, LoadOutcome::Hit);
            Some(document)
        }
        Ok(None) => {
            record_load(LoadKind::Policy, LoadOutcome::Miss);
            None
        }
        Err(err) => {
            record_load(LoadKind::Policy, LoadOutcome::Error);
            tracing::warn!(tenant = %tenant, document = name, error = %err, "Failed to read tenant document");
            None
        }
    }
}

/// Cache directive for `extension` under the tenant's policy document.
pub async fn cache_directive(state: &AppState, tenant: &Tenant, extension: &str) -> CacheDirective {
    match load_document(state, tenant, &state.config.cache_policy_file).await {
        Some(document) => policy_for(Some(&document), extension),
        None => builtin_directive(extension),
    }
}

/// The tenant's fallback map, if present and parseable.
pub async fn fallback_map(state: &AppState, tenant: &Tenant) -> Option<FallbackMap> {
    let document = load_document(state, tenant, &state.config.fallback_map_file).await?;
    match FallbackMap::parse(&document) {
        Ok(map) => Some(map),
        Err(err) => {
            tracing::warn!(tenant = %tenant, error = %err, "Unparseable fallback map, using generic responses");
            None
        }
    }
}

/// Successful response with validator and cache policy. A matching
/// `If-None-Match` short-circuits to an empty 304.
pub fn asset_response(
    rendered: RenderedAsset,
    directive: CacheDirective,
    if_none_match: Option<&HeaderValue>,
) -> Response {
    let validator = etag::etag(&rendered.body);
    let cache_control = directive.header_value();

    if if_none_match.is_some_and(|value| etag::matches(value.as_bytes(), &validator)) {
        return (
            StatusCode::NOT_MODIFIED,
            [(header::ETAG, validator), (header::CACHE_CONTROL, cache_control)],
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, rendered.content_type.header_value().to_string()),
            (header::ETAG, validator),
            (header::CACHE_CONTROL, cache_control),
        ],
        rendered.body,
    )
        .into_response()
}

/// Tenant-provided fallback content under the original status.
pub fn fallback_response(rendered: RenderedAsset, status: StatusCode) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, rendered.content_type.header_value()),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        rendered.body,
    )
        .into_response()
}

/// Minimal plain-text body for `status`.
pub fn generic_response(status: StatusCode) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        generic_body(status),
    )
        .into_response()
}
