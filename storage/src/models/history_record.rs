//! Snapshot of a message's content taken just before an edit.
//!
//! Rows are append-only; nothing in the crate updates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageHistoryRecord {
    pub id: String,
    pub message_id: String,
    /// Content the message held before the edit.
    pub content: String,
    pub edited_at: DateTime<Utc>,
}

impl MessageHistoryRecord {
    pub fn new(message_id: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message_id,
            content,
            edited_at: Utc::now(),
        }
    }
}
