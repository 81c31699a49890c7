//! Notification persistence.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use crate::error::Result;
use crate::models::NotificationRecord;
use crate::query_util::{push_id_list, ID_BATCH_SIZE};

pub async fn insert(conn: &mut SqliteConnection, notification: &NotificationRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, message_id, is_read, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&notification.id)
    .bind(&notification.user_id)
    .bind(&notification.message_id)
    .bind(notification.is_read)
    .bind(notification.created_at)
    .execute(&mut *conn)
    .await?;

    debug!(
        notification_id = %notification.id,
        user_id = %notification.user_id,
        message_id = %notification.message_id,
        "Saved notification"
    );
    Ok(())
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    notification_id: &str,
) -> Result<Option<NotificationRecord>> {
    let notification =
        sqlx::query_as::<_, NotificationRecord>("SELECT * FROM notifications WHERE id = ?")
            .bind(notification_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(notification)
}

/// Notifications addressed to `user_id`, oldest first.
pub async fn list_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    unread_only: bool,
) -> Result<Vec<NotificationRecord>> {
    let sql = if unread_only {
        "SELECT * FROM notifications WHERE user_id = ? AND is_read = 0 ORDER BY created_at ASC, rowid ASC"
    } else {
        "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at ASC, rowid ASC"
    };
    let notifications = sqlx::query_as::<_, NotificationRecord>(sql)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(notifications)
}

pub async fn list_for_message(
    conn: &mut SqliteConnection,
    message_id: &str,
) -> Result<Vec<NotificationRecord>> {
    let notifications = sqlx::query_as::<_, NotificationRecord>(
        "SELECT * FROM notifications WHERE message_id = ? ORDER BY created_at ASC, rowid ASC",
    )
    .bind(message_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(notifications)
}

/// Returns false when no notification has that id.
pub async fn mark_read(conn: &mut SqliteConnection, notification_id: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
        .bind(notification_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Marks `user_id`'s notifications about `message_id` as read.
pub async fn mark_read_for_message(
    conn: &mut SqliteConnection,
    message_id: &str,
    user_id: &str,
) -> Result<u64> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE message_id = ? AND user_id = ?")
            .bind(message_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
    Ok(result.rows_affected())
}

pub async fn delete_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM notifications WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_for_messages(conn: &mut SqliteConnection, message_ids: &[String]) -> Result<u64> {
    let mut deleted = 0;
    for batch in message_ids.chunks(ID_BATCH_SIZE) {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("DELETE FROM notifications WHERE message_id IN ");
        push_id_list(&mut builder, batch);
        deleted += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(deleted)
}
