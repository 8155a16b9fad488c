//! Backing-store abstraction.

use async_trait::async_trait;

use crate::error::StoreError;

/// Read side of the flat key-value store holding tenant assets.
///
/// Keys are `"{tenant}/{relative path}"`. Absence is `Ok(None)`, never an
/// error.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Short backend name for logs and readiness output.
    fn backend_name(&self) -> &'static str;
}
