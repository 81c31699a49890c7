//! Query parameters for listing/filtering messages.
//!
//! Used by `message_repo::list`. Every field is optional; unset fields do not filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageQuery {
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub sent_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub sent_before: Option<DateTime<Utc>>,
    pub unread_only: bool,
    pub limit: Option<i64>,
    /// Pagination offset (used with limit).
    pub offset: Option<i64>,
}
