//! Removal of rows that only exist in reference to a deleted user or message.
//!
//! Both entry points expect to run inside the caller's transaction; dropping that
//! transaction on error discards every step, so a partial cleanup is never visible.

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use storage::{history_repo, message_repo, notification_repo, user_repo};
use tracing::info;

/// Row counts removed by one cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub messages: u64,
    pub history: u64,
    pub notifications: u64,
}

impl CleanupReport {
    fn merge(self, other: CleanupReport) -> CleanupReport {
        CleanupReport {
            messages: self.messages + other.messages,
            history: self.history + other.history,
            notifications: self.notifications + other.notifications,
        }
    }
}

/// Deletes the given messages, every reply beneath them, and the history and
/// notification rows of all of those.
pub async fn remove_messages(
    conn: &mut SqliteConnection,
    root_ids: &[String],
) -> storage::Result<CleanupReport> {
    let ids = message_repo::subtree_ids(conn, root_ids).await?;
    if ids.is_empty() {
        return Ok(CleanupReport::default());
    }

    let history = history_repo::delete_for_messages(conn, &ids).await?;
    let notifications = notification_repo::delete_for_messages(conn, &ids).await?;
    // A reply can go by foreign-key cascade before its own batch runs, so the row count
    // from the deletes undercounts; every id here existed inside this transaction.
    message_repo::delete_many(conn, &ids).await?;

    Ok(CleanupReport {
        messages: ids.len() as u64,
        history,
        notifications,
    })
}

/// Deletes `user_id` and everything that references it:
///
/// - history of messages the user sent,
/// - notifications addressed to the user,
/// - messages the user sent or received, with their reply subtrees and those messages'
///   history and notifications,
/// - `edited_by` pointers to the user (cleared, not deleted).
pub async fn remove_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> storage::Result<CleanupReport> {
    let sent_history = history_repo::delete_for_sender(conn, user_id).await?;
    let own_notifications = notification_repo::delete_for_user(conn, user_id).await?;

    let message_ids = message_repo::ids_for_user(conn, user_id).await?;
    let messages_report = remove_messages(conn, &message_ids).await?;

    let cleared = message_repo::clear_editor(conn, user_id).await?;
    user_repo::delete(conn, user_id).await?;

    let report = CleanupReport {
        messages: 0,
        history: sent_history,
        notifications: own_notifications,
    }
    .merge(messages_report);

    info!(
        user_id = %user_id,
        messages = report.messages,
        history = report.history,
        notifications = report.notifications,
        editor_refs_cleared = cleared,
        "step: user cleanup done"
    );
    Ok(report)
}
