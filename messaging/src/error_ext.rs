//! Mapping from storage errors to the caller-facing [`ChatError`] taxonomy.

use chat_core::{ChatError, Result};
use storage::StorageError;

pub(crate) fn to_chat_error(err: StorageError) -> ChatError {
    match err {
        StorageError::NotFound(what) => ChatError::NotFound(what),
        StorageError::ConstraintViolation(what) => ChatError::ConstraintViolation(what),
        StorageError::Conflict(what) => ChatError::TransactionConflict(what),
        StorageError::Database(what) => ChatError::Database(what),
    }
}

pub(crate) trait StorageResultExt<T> {
    /// Maps the error one-to-one. For reads and for the first write of a sequence.
    fn or_chat(self) -> Result<T>;

    /// For steps after the first write: the transaction is dropped, so any failure other
    /// than a conflict is reported as a rolled-back partial failure of `operation`.
    fn or_rollback(self, operation: &str) -> Result<T>;
}

impl<T> StorageResultExt<T> for std::result::Result<T, StorageError> {
    fn or_chat(self) -> Result<T> {
        self.map_err(to_chat_error)
    }

    fn or_rollback(self, operation: &str) -> Result<T> {
        self.map_err(|err| match err {
            StorageError::Conflict(what) => ChatError::TransactionConflict(what),
            other => ChatError::PartialFailure {
                operation: operation.to_string(),
                reason: other.to_string(),
            },
        })
    }
}

impl<T> StorageResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn or_chat(self) -> Result<T> {
        self.map_err(StorageError::from).or_chat()
    }

    fn or_rollback(self, operation: &str) -> Result<T> {
        self.map_err(StorageError::from).or_rollback(operation)
    }
}
