//! Mapping of database errors onto store errors.

use fxgate_core::StoreError;
use sea_orm::{DbErr, SqlErr};

/// Converts a `DbErr` into the store error the core understands.
#[must_use]
pub fn store_err(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::Conflict(detail);
    }
    match err {
        DbErr::RecordNotFound(what) => StoreError::NotFound(what),
        DbErr::RecordNotUpdated => StoreError::NotFound("record not updated".to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}
