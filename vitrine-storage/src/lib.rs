//! Vitrine Storage - Backing Store and Asset Loader
//!
//! The serving tier only ever reads: every asset, policy document and
//! fallback map is a value under a `"{tenant}/{path}"` key. Writes belong to
//! the publisher and are exposed here only as inherent helpers on the
//! backends that support them.

pub mod backend;
pub mod error;
pub mod loader;
pub mod traits;

pub use backend::{FsAssetStore, InMemoryAssetStore, LmdbAssetStore};
pub use error::StoreError;
pub use loader::AssetLoader;
pub use traits::AssetStore;
