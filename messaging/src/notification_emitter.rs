//! Post-insert notification for newly created messages.

use sqlx::SqliteConnection;
use storage::{notification_repo, MessageRecord, NotificationRecord};
use tracing::info;

/// Creates the receiver's unread notification for `message`.
///
/// Call once per created message, after its insert succeeded and in the same
/// transaction. Edits never call this.
pub async fn emit(
    conn: &mut SqliteConnection,
    message: &MessageRecord,
) -> storage::Result<NotificationRecord> {
    let notification = NotificationRecord::new(message.receiver_id.clone(), message.id.clone());
    notification_repo::insert(conn, &notification).await?;

    info!(
        message_id = %message.id,
        user_id = %notification.user_id,
        notification_id = %notification.id,
        "step: notification emitted"
    );
    Ok(notification)
}
