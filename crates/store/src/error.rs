//! Store error model.

use thiserror::Error;

/// Result type used across the store layer.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a storage backend.
///
/// The backend owns its own recovery policy (retries, reconnects); by the
/// time an error reaches the store it is final for that operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("storage backend failure: {0}")]
pub struct BackendError(String);

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Store-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Update/delete referenced a key absent from the table.
    #[error("record not found")]
    NotFound,

    /// A value could not be mapped to/from a storage row. Indicates a bug or
    /// a corrupted row; never retried.
    #[error("row translation failed: {0}")]
    Translation(String),

    /// The storage backend rejected the operation. The table and its stream
    /// are left unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StoreError {
    pub fn translation(msg: impl Into<String>) -> Self {
        Self::Translation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
