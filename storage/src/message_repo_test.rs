//! Unit tests for the repositories.
//!
//! Covers optimistic content updates, reply-subtree traversal (including a corrupt cycle),
//! filtered listing and error classification. In-memory SQLite only.

use chrono::{Duration, Utc};

use crate::error::StorageError;
use crate::models::{MessageHistoryRecord, MessageQuery, MessageRecord, UserRecord};
use crate::sqlite_pool::SqlitePoolManager;
use crate::{history_repo, message_repo, user_repo};

async fn setup() -> SqlitePoolManager {
    SqlitePoolManager::new("sqlite::memory:", 1)
        .await
        .expect("Failed to create pool")
}

async fn add_user(conn: &mut sqlx::SqliteConnection, username: &str) -> UserRecord {
    let user = UserRecord::new(username.to_string());
    user_repo::insert(conn, &user).await.expect("Failed to save user");
    user
}

#[tokio::test]
async fn test_update_content_applies_when_expected_matches() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    let alice = add_user(&mut conn, "alice").await;
    let bob = add_user(&mut conn, "bob").await;

    let message = MessageRecord::new(alice.id.clone(), bob.id.clone(), "hi".to_string(), None);
    message_repo::insert(&mut conn, &message).await.unwrap();

    message_repo::update_content(&mut conn, &message.id, "hi", "hi there", &alice.id)
        .await
        .expect("update should apply");

    let stored = message_repo::find_by_id(&mut conn, &message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "hi there");
    assert!(stored.edited);
    assert_eq!(stored.edited_by.as_deref(), Some(alice.id.as_str()));
}

#[tokio::test]
async fn test_update_content_with_stale_expectation_conflicts() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    let alice = add_user(&mut conn, "alice").await;
    let bob = add_user(&mut conn, "bob").await;

    let message = MessageRecord::new(alice.id.clone(), bob.id.clone(), "hi".to_string(), None);
    message_repo::insert(&mut conn, &message).await.unwrap();

    let result =
        message_repo::update_content(&mut conn, &message.id, "stale", "new", &alice.id).await;
    assert!(matches!(result, Err(StorageError::Conflict(_))));

    let stored = message_repo::find_by_id(&mut conn, &message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "hi");
    assert!(!stored.edited);
}

#[tokio::test]
async fn test_subtree_ids_terminates_on_parent_cycle() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    let alice = add_user(&mut conn, "alice").await;
    let bob = add_user(&mut conn, "bob").await;

    let root = MessageRecord::new(alice.id.clone(), bob.id.clone(), "root".to_string(), None);
    message_repo::insert(&mut conn, &root).await.unwrap();
    let reply = MessageRecord::new(
        bob.id.clone(),
        alice.id.clone(),
        "reply".to_string(),
        Some(root.id.clone()),
    );
    message_repo::insert(&mut conn, &reply).await.unwrap();

    // Corrupt the tree: root now points at its own reply.
    sqlx::query("UPDATE messages SET parent_id = ? WHERE id = ?")
        .bind(&reply.id)
        .bind(&root.id)
        .execute(&mut *conn)
        .await
        .unwrap();

    let mut ids = message_repo::subtree_ids(&mut conn, &[root.id.clone()])
        .await
        .unwrap();
    ids.sort();
    let mut expected = vec![root.id.clone(), reply.id.clone()];
    expected.sort();
    assert_eq!(ids, expected);

    let rows = message_repo::thread_rows(&mut conn, &root.id, 16).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, root.id);
}

#[tokio::test]
async fn test_list_filters_by_sender_and_date() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    let alice = add_user(&mut conn, "alice").await;
    let bob = add_user(&mut conn, "bob").await;

    let mut old = MessageRecord::new(alice.id.clone(), bob.id.clone(), "old".to_string(), None);
    old.created_at = Utc::now() - Duration::days(3);
    message_repo::insert(&mut conn, &old).await.unwrap();
    let recent = MessageRecord::new(alice.id.clone(), bob.id.clone(), "recent".to_string(), None);
    message_repo::insert(&mut conn, &recent).await.unwrap();
    let from_bob = MessageRecord::new(bob.id.clone(), alice.id.clone(), "bob".to_string(), None);
    message_repo::insert(&mut conn, &from_bob).await.unwrap();

    let query = MessageQuery {
        sender_id: Some(alice.id.clone()),
        sent_after: Some(Utc::now() - Duration::days(1)),
        ..MessageQuery::default()
    };
    let messages = message_repo::list(&mut conn, &query).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "recent");

    let paged = MessageQuery {
        limit: Some(2),
        offset: Some(1),
        ..MessageQuery::default()
    };
    let messages = message_repo::list(&mut conn, &paged).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "recent");
    assert_eq!(messages[1].content, "bob");
}

#[tokio::test]
async fn test_history_listed_in_edit_order() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    let alice = add_user(&mut conn, "alice").await;
    let bob = add_user(&mut conn, "bob").await;

    let message = MessageRecord::new(alice.id.clone(), bob.id.clone(), "v3".to_string(), None);
    message_repo::insert(&mut conn, &message).await.unwrap();
    for content in ["v1", "v2"] {
        let entry = MessageHistoryRecord::new(message.id.clone(), content.to_string());
        history_repo::insert(&mut conn, &entry).await.unwrap();
    }

    let history = history_repo::list_for_message(&mut conn, &message.id)
        .await
        .unwrap();
    let contents: Vec<&str> = history.iter().map(|h| h.content.as_str()).collect();
    assert_eq!(contents, vec!["v1", "v2"]);
}

#[tokio::test]
async fn test_missing_sender_is_constraint_violation() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    let bob = add_user(&mut conn, "bob").await;

    let message = MessageRecord::new("ghost".to_string(), bob.id.clone(), "hi".to_string(), None);
    let result = message_repo::insert(&mut conn, &message).await;
    assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_duplicate_username_is_constraint_violation() {
    let manager = setup().await;
    let mut conn = manager.pool().acquire().await.unwrap();
    add_user(&mut conn, "alice").await;

    let duplicate = UserRecord::new("alice".to_string());
    let result = user_repo::insert(&mut conn, &duplicate).await;
    assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
}
