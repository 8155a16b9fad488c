//! LMDB-backed asset store.
//!
//! Uses the heed crate (Rust bindings for LMDB): one memory-mapped
//! environment with a single unnamed database keyed by the UTF-8 asset key.
//! Reads use short read transactions; `put` is for the publisher side and
//! tests.

use std::path::Path;

use async_trait::async_trait;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::error::StoreError;
use crate::traits::AssetStore;

pub struct LmdbAssetStore {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbAssetStore {
    /// Open (or create) an LMDB store.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    pub fn open<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per process for this path.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| StoreError::EnvOpen(e.to_string()))?;

        let mut wtxn = env
            .write_txn()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| StoreError::DbOpen(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        tracing::info!(path = %path.as_ref().display(), max_size_mb, "Opened LMDB asset store");
        Ok(Self { env, db })
    }

    /// Write `value` at `key`, replacing any previous value.
    pub fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self
            .env
            .write_txn()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        self.db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        wtxn.commit()
            .map_err(|e| StoreError::Transaction(e.to_string()))
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;
        self.db
            .len(&rtxn)
            .map_err(|e| StoreError::Transaction(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl AssetStore for LmdbAssetStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self
            .env
            .read_txn()
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        self.db
            .get(&rtxn, key.as_bytes())
            .map(|value| value.map(<[u8]>::to_vec))
            .map_err(|e| StoreError::Transaction(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "lmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (LmdbAssetStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = LmdbAssetStore::open(temp_dir.path(), 10).expect("Failed to open store");
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (store, _dir) = create_test_store();
        store.put("acme/index.html", b"<h1>hi</h1>").unwrap();

        assert_eq!(
            store.get("acme/index.html").await.unwrap(),
            Some(b"<h1>hi</h1>".to_vec())
        );
        assert_eq!(store.get("acme/missing.html").await.unwrap(), None);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_and_tenant_prefixes() {
        let (store, _dir) = create_test_store();
        store.put("acme/app.js", b"one").unwrap();
        store.put("acme/app.js", b"two").unwrap();
        store.put("other/app.js", b"three").unwrap();

        assert_eq!(store.get("acme/app.js").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.get("other/app.js").await.unwrap(), Some(b"three".to_vec()));
        assert_eq!(store.len().unwrap(), 2);
    }
}
