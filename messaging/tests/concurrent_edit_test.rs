//! Concurrent edits against a file-backed database with several pooled connections.
//!
//! Interleaved edits may fail with a retryable conflict, but every edit that succeeds must
//! leave exactly one history row.

use chat_core::{ChatConfig, ChatError};
use messaging::MessagingService;

/// **Test: No history row is lost or duplicated under concurrent edits.**
///
/// **Setup:** File database with 4 connections; A sends B "v0".
/// **Action:** 8 tasks each edit the message to a distinct content at the same time.
/// **Expected:** Every failure is a `TransactionConflict`; history rows == successful edits;
/// the message is edited iff some edit succeeded.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_edits_keep_one_history_row_per_success() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = ChatConfig {
        database_url: format!("sqlite://{}", dir.path().join("chat.db").display()),
        max_connections: 4,
        ..ChatConfig::default()
    };
    let service = MessagingService::connect(&config).await.expect("connect");

    let alice = service.create_user("alice").await.unwrap();
    let bob = service.create_user("bob").await.unwrap();
    let message = service
        .create_message(&alice.id, &bob.id, "v0", None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 1..=8 {
        let service = service.clone();
        let message_id = message.id.clone();
        let editor_id = alice.id.clone();
        handles.push(tokio::spawn(async move {
            service
                .update_message_content(&message_id, &format!("v{}", i), &editor_id)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(err) => {
                assert!(
                    matches!(err, ChatError::TransactionConflict(_)),
                    "unexpected error: {}",
                    err
                );
                assert!(err.is_retryable());
            }
        }
    }

    let history = service.message_history(&message.id).await.unwrap();
    assert_eq!(history.len(), successes);

    let stored = service.get_message(&message.id).await.unwrap();
    assert_eq!(stored.edited, successes > 0);
    if successes > 0 {
        assert_eq!(history[0].content, "v0");
        assert_ne!(stored.content, "v0");
    }
}

/// **Test: A retried edit after a conflict succeeds with fresh data.**
///
/// **Setup:** File database; A sends B "start".
/// **Action:** Sequential edits "one", "two".
/// **Expected:** History ["start", "one"]; nothing conflicts without interleaving.
#[tokio::test]
async fn test_sequential_edits_on_file_database() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = ChatConfig {
        database_url: format!("sqlite://{}", dir.path().join("chat.db").display()),
        ..ChatConfig::default()
    };
    let service = MessagingService::connect(&config).await.expect("connect");

    let alice = service.create_user("alice").await.unwrap();
    let bob = service.create_user("bob").await.unwrap();
    let message = service
        .create_message(&alice.id, &bob.id, "start", None)
        .await
        .unwrap();

    service.update_message_content(&message.id, "one", &alice.id).await.unwrap();
    service.update_message_content(&message.id, "two", &alice.id).await.unwrap();

    let history = service.message_history(&message.id).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|h| h.content.as_str()).collect();
    assert_eq!(contents, vec!["start", "one"]);
}
