//! CLI parser.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chat")]
#[command(about = "Messaging store CLI: send, edit, read and delete messages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Overrides DATABASE_URL.
    #[arg(short, long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create a user.
    AddUser { username: String },
    /// Send a message (optionally as a reply).
    Send {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        content: String,
        #[arg(long)]
        reply_to: Option<String>,
    },
    /// Change a message's content; the old content goes to its history.
    Edit {
        message_id: String,
        content: String,
        #[arg(long)]
        editor: String,
    },
    /// Mark a message (and its notification) read.
    Read { message_id: String },
    /// Delete a message with its replies, history and notifications.
    DeleteMessage { message_id: String },
    /// Delete a user and everything that references them.
    DeleteUser { user_id: String },
    /// List a user's unread messages.
    Unread { user_id: String },
    /// Show a message and its replies as a tree.
    Thread { message_id: String },
    /// Show a message's earlier contents.
    History { message_id: String },
    /// List a user's notifications.
    Notifications {
        user_id: String,
        #[arg(long)]
        unread: bool,
    },
    /// List messages with optional filters.
    List {
        #[arg(long)]
        sender: Option<String>,
        #[arg(long)]
        receiver: Option<String>,
        /// RFC 3339 timestamp, inclusive.
        #[arg(long)]
        sent_after: Option<DateTime<Utc>>,
        /// RFC 3339 timestamp, inclusive.
        #[arg(long)]
        sent_before: Option<DateTime<Utc>>,
        #[arg(long)]
        unread: bool,
        #[arg(short, long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_send_with_reply() {
        let cli = Cli::try_parse_from([
            "chat", "send", "--from", "a", "--to", "b", "hello", "--reply-to", "m1",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Commands::Send {
                from: "a".to_string(),
                to: "b".to_string(),
                content: "hello".to_string(),
                reply_to: Some("m1".to_string()),
            }
        );
        assert!(cli.database_url.is_none());
    }

    #[test]
    fn test_parse_global_database_url() {
        let cli = Cli::try_parse_from(["chat", "unread", "u1", "--database-url", "sqlite::memory:"])
            .unwrap();

        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(
            cli.command,
            Commands::Unread {
                user_id: "u1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_list_dates() {
        let cli = Cli::try_parse_from([
            "chat",
            "list",
            "--sent-after",
            "2024-01-01T00:00:00Z",
            "--limit",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::List {
                sent_after, limit, ..
            } => {
                assert_eq!(sent_after.unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_edit_requires_editor() {
        assert!(Cli::try_parse_from(["chat", "edit", "m1", "new text"]).is_err());
    }
}
