//! Storage error types.
//!
//! Used by repository implementations and callers of storage APIs. `sqlx::Error` is
//! classified on conversion so callers can tell bad references from write conflicts.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Write conflict: {0}")]
    Conflict(String),
}

/// SQLite result codes for a locked or busy database (primary and extended).
const BUSY_CODES: &[&str] = &["5", "6", "261", "262", "517", "773"];

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StorageError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation()
                    || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation)
                {
                    return StorageError::ConstraintViolation(db_err.message().to_string());
                }
                match db_err.code() {
                    Some(code) if BUSY_CODES.contains(&&*code) => {
                        StorageError::Conflict(db_err.message().to_string())
                    }
                    _ => StorageError::Database(err.to_string()),
                }
            }
            _ => StorageError::Database(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
