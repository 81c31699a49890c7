//! Message persistence and queries.
//!
//! Every function takes a `&mut SqliteConnection`, so the same call runs on a pooled
//! connection or inside a transaction (`&mut *tx`).

use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::{MessageQuery, MessageRecord, MessageSummary};
use crate::query_util::{push_id_list, ID_BATCH_SIZE};

pub async fn insert(conn: &mut SqliteConnection, message: &MessageRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, receiver_id, content, created_at, edited, edited_by, parent_id, read)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&message.id)
    .bind(&message.sender_id)
    .bind(&message.receiver_id)
    .bind(&message.content)
    .bind(message.created_at)
    .bind(message.edited)
    .bind(&message.edited_by)
    .bind(&message.parent_id)
    .bind(message.read)
    .execute(&mut *conn)
    .await?;

    info!(
        message_id = %message.id,
        sender_id = %message.sender_id,
        receiver_id = %message.receiver_id,
        "Saved message"
    );
    Ok(())
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    message_id: &str,
) -> Result<Option<MessageRecord>> {
    let message = sqlx::query_as::<_, MessageRecord>("SELECT * FROM messages WHERE id = ?")
        .bind(message_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(message)
}

/// Replaces the content and sets the sticky edited flag.
///
/// Applies only while the stored content still equals `expected_content`; otherwise
/// another writer got there first and the call fails with [`StorageError::Conflict`].
pub async fn update_content(
    conn: &mut SqliteConnection,
    message_id: &str,
    expected_content: &str,
    new_content: &str,
    editor_id: &str,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE messages SET content = ?, edited = 1, edited_by = ? WHERE id = ? AND content = ?",
    )
    .bind(new_content)
    .bind(editor_id)
    .bind(message_id)
    .bind(expected_content)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::Conflict(format!(
            "message {} changed since it was read",
            message_id
        )));
    }
    Ok(())
}

/// Returns false when no message has that id.
pub async fn mark_read(conn: &mut SqliteConnection, message_id: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE messages SET read = 1 WHERE id = ?")
        .bind(message_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Filtered listing, oldest first.
pub async fn list(conn: &mut SqliteConnection, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
    let mut builder: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("SELECT * FROM messages WHERE 1=1");

    if let Some(sender_id) = &query.sender_id {
        builder.push(" AND sender_id = ").push_bind(sender_id.clone());
    }
    if let Some(receiver_id) = &query.receiver_id {
        builder.push(" AND receiver_id = ").push_bind(receiver_id.clone());
    }
    if let Some(after) = query.sent_after {
        builder.push(" AND created_at >= ").push_bind(after);
    }
    if let Some(before) = query.sent_before {
        builder.push(" AND created_at <= ").push_bind(before);
    }
    if query.unread_only {
        builder.push(" AND read = 0");
    }

    builder.push(" ORDER BY created_at ASC, rowid ASC");

    // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
    if query.limit.is_some() || query.offset.is_some() {
        builder.push(" LIMIT ").push_bind(query.limit.unwrap_or(-1));
        if let Some(offset) = query.offset {
            builder.push(" OFFSET ").push_bind(offset);
        }
    }

    let messages = builder
        .build_query_as::<MessageRecord>()
        .fetch_all(&mut *conn)
        .await?;
    info!("Retrieved {} messages", messages.len());

    Ok(messages)
}

/// Unread messages received by `user_id`, projected to the list-view columns.
///
/// Joins only the sender's username instead of loading sender records.
pub async fn unread_summaries(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<MessageSummary>> {
    let summaries = sqlx::query_as::<_, MessageSummary>(
        r#"
        SELECT m.id, m.content, m.created_at, u.username AS sender_username
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.receiver_id = ? AND m.read = 0
        ORDER BY m.created_at ASC, m.rowid ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    debug!(user_id = %user_id, count = summaries.len(), "Retrieved unread summaries");
    Ok(summaries)
}

/// Ids of messages sent or received by `user_id`.
pub async fn ids_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<String>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT id FROM messages WHERE sender_id = ? OR receiver_id = ?")
            .bind(user_id)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// The given messages plus every reply beneath them, at any depth.
///
/// `UNION` discards rows already produced, so a corrupt parent cycle terminates. Roots
/// are expanded in batches; an id reached from more than one batch is returned once.
pub async fn subtree_ids(conn: &mut SqliteConnection, root_ids: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for batch in root_ids.chunks(ID_BATCH_SIZE) {
        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "WITH RECURSIVE subtree(id) AS (SELECT id FROM messages WHERE id IN ",
        );
        push_id_list(&mut builder, batch);
        builder.push(
            " UNION SELECT m.id FROM messages m JOIN subtree s ON m.parent_id = s.id) SELECT id FROM subtree",
        );

        let rows: Vec<(String,)> = builder.build_query_as().fetch_all(&mut *conn).await?;
        for (id,) in rows {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

/// Root message and its replies down to `max_depth` levels, ordered by the depth each
/// row was first reached at, then creation time.
pub async fn thread_rows(
    conn: &mut SqliteConnection,
    root_id: &str,
    max_depth: u32,
) -> Result<Vec<MessageRecord>> {
    let messages = sqlx::query_as::<_, MessageRecord>(
        r#"
        WITH RECURSIVE thread(id, depth) AS (
            SELECT id, 0 FROM messages WHERE id = ?
            UNION
            SELECT m.id, t.depth + 1
            FROM messages m JOIN thread t ON m.parent_id = t.id
            WHERE t.depth < ?
        )
        SELECT m.*
        FROM messages m
        JOIN (SELECT id, MIN(depth) AS depth FROM thread GROUP BY id) t ON t.id = m.id
        ORDER BY t.depth ASC, m.created_at ASC, m.rowid ASC
        "#,
    )
    .bind(root_id)
    .bind(i64::from(max_depth))
    .fetch_all(&mut *conn)
    .await?;
    Ok(messages)
}

pub async fn delete_many(conn: &mut SqliteConnection, message_ids: &[String]) -> Result<u64> {
    let mut deleted = 0;
    for batch in message_ids.chunks(ID_BATCH_SIZE) {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("DELETE FROM messages WHERE id IN ");
        push_id_list(&mut builder, batch);
        deleted += builder.build().execute(&mut *conn).await?.rows_affected();
    }

    info!("Deleted {} messages", deleted);
    Ok(deleted)
}

/// Clears `edited_by` wherever it points at `user_id`.
pub async fn clear_editor(conn: &mut SqliteConnection, user_id: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE messages SET edited_by = NULL WHERE edited_by = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
