//! Error types for Vitrine operations

use thiserror::Error;

/// Backing-store failures surfaced through the asset loader.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Master error type for the serving pipeline.
///
/// Variants map one-to-one onto the categories the dispatcher branches on:
/// client input is terminal, `NotFound` goes to the 404 fallback, everything
/// else is an unexpected internal error and goes to the 500 fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VitrineError {
    /// The request path cannot name an asset (no tenant, traversal segment).
    #[error("Invalid request path: {reason}")]
    ClientInput { reason: String },

    /// The backing store holds no value for the key.
    #[error("Asset not found: {key}")]
    NotFound { key: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A text-mode load found bytes that are not UTF-8.
    #[error("Asset {key} is not valid UTF-8")]
    Decode { key: String },

    /// The request overran its serving deadline.
    #[error("Timed out after {millis}ms serving {path}")]
    Timeout { path: String, millis: u64 },
}

impl VitrineError {
    pub fn client_input(reason: impl Into<String>) -> Self {
        Self::ClientInput {
            reason: reason.into(),
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// True for the typed absence signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True for errors that must not enter the fallback chain.
    pub fn is_client_input(&self) -> bool {
        matches!(self, Self::ClientInput { .. })
    }
}

/// Result type for all Vitrine operations.
pub type VitrineResult<T> = Result<T, VitrineError>;
