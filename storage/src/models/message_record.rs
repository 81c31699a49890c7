//! Message record model for persistence.
//!
//! Maps to the `messages` table. `parent_id` links a reply to the message it answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Sticky: once set it is never cleared.
    pub edited: bool,
    pub edited_by: Option<String>,
    pub parent_id: Option<String>,
    pub read: bool,
}

impl MessageRecord {
    /// Creates a new unread, unedited record with a generated UUID and current timestamp.
    pub fn new(
        sender_id: String,
        receiver_id: String,
        content: String,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id,
            receiver_id,
            content,
            created_at: Utc::now(),
            edited: false,
            edited_by: None,
            parent_id,
            read: false,
        }
    }
}
