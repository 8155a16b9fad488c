//! Store backends.

mod fs;
mod lmdb;
mod memory;

pub use fs::FsAssetStore;
pub use lmdb::LmdbAssetStore;
pub use memory::InMemoryAssetStore;
