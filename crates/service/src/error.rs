//! Typed error enum for the service layer.

use casenotes_storage::StorageError;
use thiserror::Error;

/// Service-layer error. Summarization failures never appear here: the
/// timeline falls back to the local digest instead of propagating them.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided invalid input (empty label, foreign-case note id).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::InvalidInput(_) => false,
        }
    }

    /// Whether this error represents a not-found condition.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }

    /// Whether this error represents a duplicate/conflict, e.g. two "new
    /// session" requests racing for the same index.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_duplicate(),
            Self::InvalidInput(_) => false,
        }
    }
}
