//! Service surface: one SQLite transaction per mutation, with the history, notification
//! and cleanup steps run inside it in a fixed order.

use chat_core::config::MAX_THREAD_DEPTH;
use chat_core::{ChatConfig, ChatError, Result};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, Transaction};
use storage::{
    history_repo, message_repo, notification_repo, user_repo, MessageHistoryRecord, MessageQuery,
    MessageRecord, MessageSummary, NotificationRecord, SqlitePoolManager, UserRecord,
};
use tracing::{debug, info, instrument};

use crate::cascade_cleaner::{self, CleanupReport};
use crate::error_ext::StorageResultExt;
use crate::thread::{self, MessageThread};
use crate::{history_recorder, notification_emitter, unread};

#[derive(Clone)]
pub struct MessagingService {
    pool_manager: SqlitePoolManager,
    thread_max_depth: u32,
}

impl MessagingService {
    /// `thread_max_depth` is clamped to [`MAX_THREAD_DEPTH`].
    pub fn new(pool_manager: SqlitePoolManager, thread_max_depth: u32) -> Self {
        Self {
            pool_manager,
            thread_max_depth: thread_max_depth.min(MAX_THREAD_DEPTH),
        }
    }

    /// Opens the database named by `config` (creating the schema if needed).
    pub async fn connect(config: &ChatConfig) -> Result<Self> {
        let pool_manager =
            SqlitePoolManager::new(&config.database_url, config.max_connections)
                .await
                .or_chat()?;
        Ok(Self::new(pool_manager, config.thread_max_depth))
    }

    pub fn pool_manager(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool_manager.pool().begin().await.or_chat()
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool_manager.pool().acquire().await.or_chat()
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, username: &str) -> Result<UserRecord> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ChatError::ConstraintViolation(
                "username must not be empty".to_string(),
            ));
        }

        let user = UserRecord::new(username.to_string());
        let mut conn = self.acquire().await?;
        user_repo::insert(&mut conn, &user).await.or_chat()?;
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserRecord> {
        let mut conn = self.acquire().await?;
        user_repo::find_by_id(&mut conn, user_id)
            .await
            .or_chat()?
            .ok_or_else(|| ChatError::NotFound(format!("user {}", user_id)))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<UserRecord> {
        let mut conn = self.acquire().await?;
        user_repo::find_by_username(&mut conn, username)
            .await
            .or_chat()?
            .ok_or_else(|| ChatError::NotFound(format!("user named {}", username)))
    }

    pub async fn get_message(&self, message_id: &str) -> Result<MessageRecord> {
        let mut conn = self.acquire().await?;
        load_message(&mut conn, message_id).await
    }

    /// Persists a new message and, in the same transaction, the receiver's notification.
    #[instrument(skip(self, content))]
    pub async fn create_message(
        &self,
        sender_id: &str,
        receiver_id: &str,
        content: &str,
        parent_id: Option<&str>,
    ) -> Result<MessageRecord> {
        if content.trim().is_empty() {
            return Err(ChatError::ConstraintViolation(
                "message content must not be empty".to_string(),
            ));
        }

        let mut tx = self.begin().await?;
        require_user(&mut tx, sender_id).await?;
        require_user(&mut tx, receiver_id).await?;
        if let Some(parent_id) = parent_id {
            load_message(&mut tx, parent_id).await?;
        }

        let message = MessageRecord::new(
            sender_id.to_string(),
            receiver_id.to_string(),
            content.to_string(),
            parent_id.map(str::to_string),
        );
        message_repo::insert(&mut tx, &message).await.or_chat()?;
        notification_emitter::emit(&mut tx, &message)
            .await
            .or_rollback("create_message")?;

        tx.commit().await.or_rollback("create_message")?;

        info!(message_id = %message.id, "step: message created");
        Ok(message)
    }

    /// Replaces a message's content. A real change records the old content as history
    /// first and sets the sticky edited flag; identical content is a no-op.
    #[instrument(skip(self, new_content))]
    pub async fn update_message_content(
        &self,
        message_id: &str,
        new_content: &str,
        editor_id: &str,
    ) -> Result<MessageRecord> {
        if new_content.trim().is_empty() {
            return Err(ChatError::ConstraintViolation(
                "message content must not be empty".to_string(),
            ));
        }

        let mut tx = self.begin().await?;
        let current = load_message(&mut tx, message_id).await?;
        require_user(&mut tx, editor_id).await?;

        let recorded = history_recorder::record_if_changed(&mut tx, &current, new_content)
            .await
            .or_chat()?;
        if recorded.is_none() {
            debug!(message_id = %message_id, "step: edit skipped, content unchanged");
            return Ok(current);
        }

        message_repo::update_content(&mut tx, message_id, &current.content, new_content, editor_id)
            .await
            .or_rollback("update_message_content")?;

        tx.commit().await.or_rollback("update_message_content")?;

        info!(message_id = %message_id, editor_id = %editor_id, "step: message edited");
        Ok(MessageRecord {
            content: new_content.to_string(),
            edited: true,
            edited_by: Some(editor_id.to_string()),
            ..current
        })
    }

    /// Deletes a message together with its replies and their history and notifications.
    #[instrument(skip(self))]
    pub async fn delete_message(&self, message_id: &str) -> Result<()> {
        let mut tx = self.begin().await?;
        load_message(&mut tx, message_id).await?;

        let report = cascade_cleaner::remove_messages(&mut tx, &[message_id.to_string()])
            .await
            .or_rollback("delete_message")?;

        tx.commit().await.or_rollback("delete_message")?;

        info!(
            message_id = %message_id,
            messages = report.messages,
            history = report.history,
            notifications = report.notifications,
            "step: message deleted"
        );
        Ok(())
    }

    /// Deletes a user and every row that references it, atomically.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> Result<CleanupReport> {
        let mut tx = self.begin().await?;
        require_user(&mut tx, user_id).await?;

        let report = cascade_cleaner::remove_user(&mut tx, user_id)
            .await
            .or_rollback("delete_user")?;

        tx.commit().await.or_rollback("delete_user")?;
        Ok(report)
    }

    /// Unread messages received by `user_id`, oldest first.
    pub async fn list_unread(&self, user_id: &str) -> Result<Vec<MessageSummary>> {
        let mut conn = self.acquire().await?;
        require_user(&mut conn, user_id).await?;
        unread::unread_for_user(&mut conn, user_id).await.or_chat()
    }

    pub async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
        let mut conn = self.acquire().await?;
        message_repo::list(&mut conn, query).await.or_chat()
    }

    /// Reply tree under `root_id`, cut off at the configured depth.
    pub async fn get_thread(&self, root_id: &str) -> Result<MessageThread> {
        let mut conn = self.acquire().await?;
        let rows = message_repo::thread_rows(&mut conn, root_id, self.thread_max_depth)
            .await
            .or_chat()?;

        thread::build(rows, root_id, self.thread_max_depth)
            .ok_or_else(|| ChatError::NotFound(format!("message {}", root_id)))
    }

    /// Earlier contents of a message, oldest edit first.
    pub async fn message_history(&self, message_id: &str) -> Result<Vec<MessageHistoryRecord>> {
        let mut conn = self.acquire().await?;
        load_message(&mut conn, message_id).await?;
        history_repo::list_for_message(&mut conn, message_id)
            .await
            .or_chat()
    }

    /// Marks a message read along with the receiver's notification about it.
    #[instrument(skip(self))]
    pub async fn mark_message_read(&self, message_id: &str) -> Result<()> {
        let mut tx = self.begin().await?;
        let message = load_message(&mut tx, message_id).await?;

        message_repo::mark_read(&mut tx, message_id).await.or_chat()?;
        notification_repo::mark_read_for_message(&mut tx, message_id, &message.receiver_id)
            .await
            .or_rollback("mark_message_read")?;

        tx.commit().await.or_rollback("mark_message_read")?;
        Ok(())
    }

    pub async fn notifications_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<NotificationRecord>> {
        let mut conn = self.acquire().await?;
        require_user(&mut conn, user_id).await?;
        notification_repo::list_for_user(&mut conn, user_id, unread_only)
            .await
            .or_chat()
    }

    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let mut conn = self.acquire().await?;
        if !notification_repo::mark_read(&mut conn, notification_id)
            .await
            .or_chat()?
        {
            return Err(ChatError::NotFound(format!(
                "notification {}",
                notification_id
            )));
        }
        Ok(())
    }
}

async fn require_user(conn: &mut SqliteConnection, user_id: &str) -> Result<()> {
    if user_repo::exists(conn, user_id).await.or_chat()? {
        Ok(())
    } else {
        Err(ChatError::NotFound(format!("user {}", user_id)))
    }
}

async fn load_message(conn: &mut SqliteConnection, message_id: &str) -> Result<MessageRecord> {
    message_repo::find_by_id(conn, message_id)
        .await
        .or_chat()?
        .ok_or_else(|| ChatError::NotFound(format!("message {}", message_id)))
}
