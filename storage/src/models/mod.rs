//! Data models for storage (users, messages, history, notifications, queries).
//!
//! Used by the repositories and callers of the storage API.

mod history_record;
mod message_query;
mod message_record;
mod message_summary;
mod notification_record;
mod user_record;

pub use history_record::MessageHistoryRecord;
pub use message_query::MessageQuery;
pub use message_record::MessageRecord;
pub use message_summary::MessageSummary;
pub use notification_record::NotificationRecord;
pub use user_record::UserRecord;
