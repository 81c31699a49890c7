//! Unread-message list query.

use sqlx::SqliteConnection;
use storage::{message_repo, MessageSummary};

/// Unread messages received by `user_id`, oldest first, as list-view summaries.
///
/// Read-only; repeated calls over unchanged data return the same rows in the same order.
pub async fn unread_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> storage::Result<Vec<MessageSummary>> {
    message_repo::unread_summaries(conn, user_id).await
}
