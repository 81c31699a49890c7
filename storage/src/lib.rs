//! Storage crate: SQLite persistence for users, messages, message history and notifications.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, MessageRecord, MessageHistoryRecord, NotificationRecord, MessageSummary, MessageQuery
//! - [`user_repo`], [`message_repo`], [`history_repo`], [`notification_repo`] – per-table queries
//! - [`sqlite_pool`] – SqlitePoolManager (pool + schema)
//!
//! Repository functions take `&mut SqliteConnection` so callers choose the transaction boundary.

mod error;
pub mod history_repo;
pub mod message_repo;
mod models;
pub mod notification_repo;
mod query_util;
mod sqlite_pool;
pub mod user_repo;

#[cfg(test)]
mod message_repo_test;

pub use error::{Result, StorageError};
pub use models::{
    MessageHistoryRecord, MessageQuery, MessageRecord, MessageSummary, NotificationRecord,
    UserRecord,
};
pub use sqlite_pool::SqlitePoolManager;
