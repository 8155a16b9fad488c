//! Request dispatcher for tenant content.
//!
//! Installed as the router fallback so every path not claimed by an
//! operational route lands here. The outer boundary never surfaces a raw
//! error: everything past path resolution goes through the fallback chain.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use vitrine_core::{resolve, AssetPath, Resolution, VitrineError};

use crate::error::ServeError;
use crate::fallback::fallback;
use crate::headers::ALLOWED_METHODS;
use crate::pipeline;
use crate::state::AppState;

/// Dispatch one request by method.
pub async fn serve(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match method {
        Method::GET => get_asset(&state, &uri, &headers).await,
        Method::HEAD => {
            let (parts, _) = get_asset(&state, &uri, &headers).await.into_parts();
            Response::from_parts(parts, axum::body::Body::empty())
        }
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        _ => (
            [(header::ALLOW, ALLOWED_METHODS)],
            ServeError::method_not_allowed(),
        )
            .into_response(),
    }
}

async fn get_asset(state: &AppState, uri: &Uri, headers: &HeaderMap) -> Response {
    let asset = match resolve(uri.path(), uri.query()) {
        Ok(Resolution::Asset(asset)) => asset,
        Ok(Resolution::Redirect(location)) => {
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response();
        }
        Err(err) => {
            tracing::debug!(path = %uri.path(), error = %err, "Rejected request path");
            return ServeError::from(err).into_response();
        }
    };

    let timeout = state.config.request_timeout;
    match tokio::time::timeout(timeout, respond(state, &asset, headers)).await {
        Ok(response) => response,
        Err(_) => {
            let err = VitrineError::Timeout {
                path: asset.key(),
                millis: timeout.as_millis() as u64,
            };
            tracing::error!(error = %err, "Serve step timed out");
            // The fallback gets the same budget; past that a bare 500 goes out.
            tokio::time::timeout(
                timeout,
                fallback(state, &asset.tenant, StatusCode::INTERNAL_SERVER_ERROR),
            )
            .await
            .unwrap_or_else(|_| pipeline::generic_response(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

async fn respond(state: &AppState, asset: &AssetPath, headers: &HeaderMap) -> Response {
    let (rendered, directive) = futures_util::future::join(
        pipeline::render_asset(state, asset),
        pipeline::cache_directive(state, &asset.tenant, &asset.extension),
    )
    .await;

    match rendered {
        Ok(rendered) => {
            pipeline::asset_response(rendered, directive, headers.get(header::IF_NONE_MATCH))
        }
        Err(err) => {
            let err = ServeError::from(err);
            if !err.is_fallback_eligible() {
                return err.into_response();
            }
            if err.code.status_code().is_server_error() {
                tracing::error!(key = %asset.key(), error = %err, "Failed to serve asset");
            } else {
                tracing::debug!(key = %asset.key(), error = %err, "Asset not served");
            }
            fallback(state, &asset.tenant, err.fallback_status()).await
        }
    }
}
