//! Per-receiver notice that a new message arrived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationRecord {
    pub id: String,
    pub user_id: String,
    pub message_id: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Creates an unread notification for `user_id` about `message_id`.
    pub fn new(user_id: String, message_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            message_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
