//! Message history persistence. Append-only: there is no update path.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use crate::error::Result;
use crate::models::MessageHistoryRecord;
use crate::query_util::{push_id_list, ID_BATCH_SIZE};

pub async fn insert(conn: &mut SqliteConnection, entry: &MessageHistoryRecord) -> Result<()> {
    sqlx::query(
        "INSERT INTO message_history (id, message_id, content, edited_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&entry.id)
    .bind(&entry.message_id)
    .bind(&entry.content)
    .bind(entry.edited_at)
    .execute(&mut *conn)
    .await?;

    debug!(message_id = %entry.message_id, history_id = %entry.id, "Saved history entry");
    Ok(())
}

/// History of one message, oldest edit first.
pub async fn list_for_message(
    conn: &mut SqliteConnection,
    message_id: &str,
) -> Result<Vec<MessageHistoryRecord>> {
    let entries = sqlx::query_as::<_, MessageHistoryRecord>(
        "SELECT * FROM message_history WHERE message_id = ? ORDER BY edited_at ASC, rowid ASC",
    )
    .bind(message_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(entries)
}

pub async fn delete_for_messages(conn: &mut SqliteConnection, message_ids: &[String]) -> Result<u64> {
    let mut deleted = 0;
    for batch in message_ids.chunks(ID_BATCH_SIZE) {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("DELETE FROM message_history WHERE message_id IN ");
        push_id_list(&mut builder, batch);
        deleted += builder.build().execute(&mut *conn).await?.rows_affected();
    }
    Ok(deleted)
}

/// Deletes history of every message sent by `user_id`.
pub async fn delete_for_sender(conn: &mut SqliteConnection, user_id: &str) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM message_history WHERE message_id IN (SELECT id FROM messages WHERE sender_id = ?)",
    )
    .bind(user_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
