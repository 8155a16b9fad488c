//! Fallback chain.
//!
//! Failed requests are answered with tenant content named in the fallback
//! map, under the original status. The mapped target is tried once; if it
//! fails too, a generic body is sent. There is no further recursion.

use axum::{http::StatusCode, response::Response};
use vitrine_core::{sub_resource_path, AssetPath, Tenant};

use crate::pipeline;
use crate::state::AppState;
use crate::telemetry::metrics::metrics;

/// Serve the fallback for `status` on `tenant`.
pub async fn fallback(state: &AppState, tenant: &Tenant, status: StatusCode) -> Response {
    if let Some(asset) = fallback_target(state, tenant, status).await {
        match pipeline::render_asset(state, &asset).await {
            Ok(rendered) => {
                record(status, true);
                tracing::debug!(
                    tenant = %tenant,
                    status = status.as_u16(),
                    fallback_target = %asset.path,
                    "Serving mapped fallback"
                );
                return pipeline::fallback_response(rendered, status);
            }
            Err(err) => {
                tracing::debug!(
                    tenant = %tenant,
                    status = status.as_u16(),
                    fallback_target = %asset.path,
                    error = %err,
                    "Fallback target failed, serving generic body"
                );
            }
        }
    }

    record(status, false);
    pipeline::generic_response(status)
}

async fn fallback_target(state: &AppState, tenant: &Tenant, status: StatusCode) -> Option<AssetPath> {
    let map = pipeline::fallback_map(state, tenant).await?;
    let target = map.target(status.as_u16())?;
    let path = sub_resource_path(target)?;
    Some(AssetPath::new(tenant.clone(), path))
}

fn record(status: StatusCode, mapped: bool) {
    if let Some(metrics) = metrics() {
        metrics.record_fallback(status.as_u16(), mapped);
    }
}
