//! Backing-store errors.

use vitrine_core::{StorageError, VitrineError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    /// The key cannot be mapped onto the backend's namespace.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    fn into_storage_error(self, key: &str) -> StorageError {
        match self {
            StoreError::LockPoisoned => StorageError::LockPoisoned,
            StoreError::EnvOpen(reason) | StoreError::DbOpen(reason) => {
                StorageError::Unavailable { reason }
            }
            other => StorageError::ReadFailed {
                key: key.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Convert into the pipeline error for a read of `key`.
    pub fn for_key(self, key: &str) -> VitrineError {
        VitrineError::Storage(self.into_storage_error(key))
    }
}

impl From<StoreError> for VitrineError {
    fn from(e: StoreError) -> Self {
        VitrineError::Storage(e.into_storage_error(""))
    }
}
