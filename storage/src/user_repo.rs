//! User persistence: insert, lookup and delete.

use sqlx::SqliteConnection;
use tracing::info;

use crate::error::Result;
use crate::models::UserRecord;

pub async fn insert(conn: &mut SqliteConnection, user: &UserRecord) -> Result<()> {
    sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
        .bind(&user.id)
        .bind(&user.username)
        .bind(user.created_at)
        .execute(&mut *conn)
        .await?;

    info!(user_id = %user.id, username = %user.username, "Saved user");
    Ok(())
}

pub async fn find_by_id(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<UserRecord>> {
    let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn find_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<UserRecord>> {
    let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

pub async fn exists(conn: &mut SqliteConnection, user_id: &str) -> Result<bool> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Deletes the user row only. Dependent rows are the caller's responsibility.
pub async fn delete(conn: &mut SqliteConnection, user_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
