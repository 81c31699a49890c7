//! Command dispatch: runs one [`Commands`] against the service and renders the result as
//! pretty JSON.

use anyhow::{Context, Result};
use messaging::{MessageQuery, MessagingService};
use serde::Serialize;
use serde_json::json;

use crate::cli::Commands;

pub async fn run_command(service: &MessagingService, command: Commands) -> Result<String> {
    match command {
        Commands::AddUser { username } => render(&service.create_user(&username).await?),
        Commands::Send {
            from,
            to,
            content,
            reply_to,
        } => render(
            &service
                .create_message(&from, &to, &content, reply_to.as_deref())
                .await?,
        ),
        Commands::Edit {
            message_id,
            content,
            editor,
        } => render(
            &service
                .update_message_content(&message_id, &content, &editor)
                .await?,
        ),
        Commands::Read { message_id } => {
            service.mark_message_read(&message_id).await?;
            render(&json!({ "read": message_id }))
        }
        Commands::DeleteMessage { message_id } => {
            service.delete_message(&message_id).await?;
            render(&json!({ "deleted": message_id }))
        }
        Commands::DeleteUser { user_id } => render(&service.delete_user(&user_id).await?),
        Commands::Unread { user_id } => render(&service.list_unread(&user_id).await?),
        Commands::Thread { message_id } => render(&service.get_thread(&message_id).await?),
        Commands::History { message_id } => render(&service.message_history(&message_id).await?),
        Commands::Notifications { user_id, unread } => {
            render(&service.notifications_for_user(&user_id, unread).await?)
        }
        Commands::List {
            sender,
            receiver,
            sent_after,
            sent_before,
            unread,
            limit,
            offset,
        } => {
            let query = MessageQuery {
                sender_id: sender,
                receiver_id: receiver,
                sent_after,
                sent_before,
                unread_only: unread,
                limit,
                offset,
            };
            render(&service.list_messages(&query).await?)
        }
    }
}

fn render<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Serialize command output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::ChatConfig;
    use serde_json::Value;

    async fn service() -> MessagingService {
        MessagingService::connect(&ChatConfig::in_memory())
            .await
            .expect("Failed to create service")
    }

    async fn run_json(service: &MessagingService, command: Commands) -> Value {
        let output = run_command(service, command).await.expect("command failed");
        serde_json::from_str(&output).expect("output is JSON")
    }

    async fn add_user(service: &MessagingService, name: &str) -> String {
        let user = run_json(
            service,
            Commands::AddUser {
                username: name.to_string(),
            },
        )
        .await;
        user["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_send_edit_history_unread() {
        let service = service().await;
        let alice = add_user(&service, "alice").await;
        let bob = add_user(&service, "bob").await;

        let sent = run_json(
            &service,
            Commands::Send {
                from: alice.clone(),
                to: bob.clone(),
                content: "hi".to_string(),
                reply_to: None,
            },
        )
        .await;
        let message_id = sent["id"].as_str().unwrap().to_string();
        assert_eq!(sent["edited"], Value::Bool(false));

        let edited = run_json(
            &service,
            Commands::Edit {
                message_id: message_id.clone(),
                content: "hi there".to_string(),
                editor: alice.clone(),
            },
        )
        .await;
        assert_eq!(edited["content"], "hi there");
        assert_eq!(edited["edited"], Value::Bool(true));

        let history = run_json(
            &service,
            Commands::History {
                message_id: message_id.clone(),
            },
        )
        .await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["content"], "hi");

        let unread = run_json(&service, Commands::Unread { user_id: bob.clone() }).await;
        assert_eq!(unread[0]["sender_username"], "alice");
        assert_eq!(unread[0]["content"], "hi there");
    }

    #[tokio::test]
    async fn test_delete_user_reports_counts() {
        let service = service().await;
        let alice = add_user(&service, "alice").await;
        let bob = add_user(&service, "bob").await;
        run_json(
            &service,
            Commands::Send {
                from: alice.clone(),
                to: bob,
                content: "hi".to_string(),
                reply_to: None,
            },
        )
        .await;

        let report = run_json(&service, Commands::DeleteUser { user_id: alice }).await;
        assert_eq!(report["messages"], 1);
        assert_eq!(report["notifications"], 1);
        assert_eq!(report["history"], 0);
    }

    #[tokio::test]
    async fn test_unknown_message_is_an_error() {
        let service = service().await;
        let result = run_command(
            &service,
            Commands::Thread {
                message_id: "missing".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
