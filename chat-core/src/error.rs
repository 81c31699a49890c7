use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    /// A referenced user, message or notification does not exist. Not retryable.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input or a broken reference. Not retryable.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Concurrent write conflict; the caller may retry once with fresh data.
    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    /// A step of a multi-step operation failed and the whole operation was rolled back.
    #[error("{operation} rolled back: {reason}")]
    PartialFailure { operation: String, reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// True only for conflicts, the one kind a caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::TransactionConflict(_))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
