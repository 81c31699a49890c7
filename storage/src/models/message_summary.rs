//! List-view projection of a message.
//!
//! Carries the sender's username instead of the full sender record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageSummary {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender_username: String,
}
