//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use vitrine_storage::{AssetLoader, AssetStore, FsAssetStore, InMemoryAssetStore, LmdbAssetStore};

use crate::config::{ServeConfig, StoreKind};
use crate::error::{ServeError, ServeResult};

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub loader: AssetLoader,
    pub config: Arc<ServeConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn AssetStore>, config: ServeConfig) -> Self {
        Self {
            loader: AssetLoader::new(store),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}

/// Open the backing store named by the configuration.
pub fn open_store(config: &ServeConfig) -> ServeResult<Arc<dyn AssetStore>> {
    let store: Arc<dyn AssetStore> = match config.store {
        StoreKind::Memory => {
            tracing::warn!("Using an empty in-memory store; nothing will be served");
            Arc::new(InMemoryAssetStore::new())
        }
        StoreKind::Lmdb => Arc::new(
            LmdbAssetStore::open(&config.store_path, config.lmdb_max_size_mb)
                .map_err(|e| ServeError::store_unavailable(e.to_string()))?,
        ),
        StoreKind::Fs => {
            if !config.store_path.is_dir() {
                tracing::warn!(
                    path = %config.store_path.display(),
                    "Store directory does not exist yet"
                );
            }
            Arc::new(FsAssetStore::new(config.store_path.clone()))
        }
    };
    Ok(store)
}
