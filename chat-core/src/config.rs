//! Runtime configuration loaded from environment variables.
//!
//! `DATABASE_URL`, `LOG_FILE`, `DB_MAX_CONNECTIONS` and `THREAD_MAX_DEPTH`; all optional.

use std::env;

use crate::error::{ChatError, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://chat.db";
pub const DEFAULT_LOG_FILE: &str = "logs/chat.log";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_THREAD_MAX_DEPTH: u32 = 64;
/// Upper bound for `THREAD_MAX_DEPTH`; thread traversal stops on depth alone when parent
/// links form a cycle.
pub const MAX_THREAD_DEPTH: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub database_url: String,
    pub log_file: String,
    pub max_connections: u32,
    /// Deepest reply level returned by thread traversal.
    pub thread_max_depth: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            thread_max_depth: DEFAULT_THREAD_MAX_DEPTH,
        }
    }
}

impl ChatConfig {
    /// Loads from the environment. `database_url` overrides `DATABASE_URL` when given.
    pub fn load(database_url: Option<String>) -> Result<Self> {
        let database_url = database_url
            .or_else(|| env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let max_connections = parse_var("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let thread_max_depth = parse_var("THREAD_MAX_DEPTH", DEFAULT_THREAD_MAX_DEPTH)?;

        if max_connections == 0 {
            return Err(ChatError::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if thread_max_depth > MAX_THREAD_DEPTH {
            return Err(ChatError::Config(format!(
                "THREAD_MAX_DEPTH must be at most {}, got {}",
                MAX_THREAD_DEPTH, thread_max_depth
            )));
        }

        Ok(Self {
            database_url,
            log_file,
            max_connections,
            thread_max_depth,
        })
    }

    /// In-memory database with defaults otherwise; used by tests.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }
}

fn parse_var(name: &str, default: u32) -> Result<u32> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ChatError::Config(format!("{} is not a valid number: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
