//! # messaging
//!
//! Transactional messaging service. Each mutation runs as one SQLite transaction:
//!
//! - [`history_recorder`] snapshots the old content before an edit is written.
//! - [`notification_emitter`] notifies the receiver after a message is inserted.
//! - [`cascade_cleaner`] removes a user's or a message's dependent rows.
//! - [`unread`] is the unread-message list query.
//! - [`thread`] assembles reply trees.
//!
//! [`MessagingService`] ties them together behind the public operations.

pub mod cascade_cleaner;
mod error_ext;
pub mod history_recorder;
pub mod notification_emitter;
mod service;
pub mod thread;
pub mod unread;

pub use cascade_cleaner::CleanupReport;
pub use service::MessagingService;
pub use thread::MessageThread;

pub use storage::{
    MessageHistoryRecord, MessageQuery, MessageRecord, MessageSummary, NotificationRecord,
    UserRecord,
};
