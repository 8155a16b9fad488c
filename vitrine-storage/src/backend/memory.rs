//! In-memory store for tests and local development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::traits::AssetStore;

#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_assets<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            assets: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Insert or replace the value at `key`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Result<(), StoreError> {
        self.assets
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .insert(key.into(), value.into());
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self
            .assets
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .remove(key)
            .is_some())
    }

    pub fn len(&self) -> usize {
        self.assets.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssetStore for InMemoryAssetStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let assets = self.assets.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(assets.get(key).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
