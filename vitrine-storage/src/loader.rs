//! Asset loader: typed reads of tenant assets over an [`AssetStore`].

use std::sync::Arc;

use async_trait::async_trait;
use vitrine_core::{
    AssetContent, LoadMode, SubResourceLoader, Tenant, VitrineError, VitrineResult,
};

use crate::traits::AssetStore;

/// Key read by readiness probes. It is never expected to exist.
pub const PROBE_KEY: &str = "__vitrine__/probe";

/// Reads tenant assets, turning absence into [`VitrineError::NotFound`].
#[derive(Clone)]
pub struct AssetLoader {
    store: Arc<dyn AssetStore>,
}

impl AssetLoader {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Load `path` for `tenant`.
    ///
    /// Text mode requires UTF-8; invalid bytes are a [`VitrineError::Decode`].
    pub async fn load(
        &self,
        tenant: &Tenant,
        path: &str,
        mode: LoadMode,
    ) -> VitrineResult<AssetContent> {
        let key = tenant.key_for(path);
        let bytes = self
            .read(&key)
            .await?
            .ok_or_else(|| VitrineError::not_found(key.clone()))?;

        match mode {
            LoadMode::Binary => Ok(AssetContent::Binary(bytes)),
            LoadMode::Text => String::from_utf8(bytes)
                .map(AssetContent::Text)
                .map_err(|_| VitrineError::Decode { key }),
        }
    }

    /// Load an optional document (cache policy, fallback map). Absence is
    /// `Ok(None)`.
    pub async fn load_optional(&self, tenant: &Tenant, path: &str) -> VitrineResult<Option<Vec<u8>>> {
        self.read(&tenant.key_for(path)).await
    }

    /// Issue one read against the store to prove it answers.
    pub async fn probe(&self) -> VitrineResult<()> {
        self.read(PROBE_KEY).await.map(|_| ())
    }

    async fn read(&self, key: &str) -> VitrineResult<Option<Vec<u8>>> {
        let result = self.store.get(key).await;
        match &result {
            Ok(Some(bytes)) => tracing::trace!(key = %key, size = bytes.len(), "Store hit"),
            Ok(None) => tracing::debug!(key = %key, "Store miss"),
            Err(err) => tracing::warn!(key = %key, error = %err, "Store read failed"),
        }
        result.map_err(|err| err.for_key(key))
    }
}

#[async_trait]
impl SubResourceLoader for AssetLoader {
    async fn load_text(&self, tenant: &Tenant, path: &str) -> VitrineResult<String> {
        match self.load(tenant, path, LoadMode::Text).await? {
            AssetContent::Text(text) => Ok(text),
            AssetContent::Binary(_) => Err(VitrineError::Decode {
                key: tenant.key_for(path),
            }),
        }
    }
}
