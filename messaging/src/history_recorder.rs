//! Pre-write history capture for message edits.
//!
//! Runs inside the update transaction and before the new content is written, so the
//! snapshot always holds the value the edit replaces.

use sqlx::SqliteConnection;
use storage::{history_repo, MessageHistoryRecord, MessageRecord};
use tracing::{debug, info};

/// Stores `current.content` as a history row when `new_content` differs from it.
///
/// Returns `None`, writing nothing, when the content is unchanged.
pub async fn record_if_changed(
    conn: &mut SqliteConnection,
    current: &MessageRecord,
    new_content: &str,
) -> storage::Result<Option<MessageHistoryRecord>> {
    if current.content == new_content {
        debug!(message_id = %current.id, "Content unchanged, no history recorded");
        return Ok(None);
    }

    let entry = MessageHistoryRecord::new(current.id.clone(), current.content.clone());
    history_repo::insert(conn, &entry).await?;

    info!(
        message_id = %current.id,
        history_id = %entry.id,
        "step: history recorded before edit"
    );
    Ok(Some(entry))
}
