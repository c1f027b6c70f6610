//! Errors reported by durable stores.

use thiserror::Error;

/// Failure modes common to every store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A unique constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// Any other backend failure.
    #[error("store failure: {0}")]
    Backend(String),
}
