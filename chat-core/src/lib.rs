//! # chat-core
//!
//! Shared pieces for the messaging workspace: the [`ChatError`] taxonomy surfaced to
//! callers, environment-driven [`ChatConfig`], and tracing initialization.

pub mod config;
pub mod error;
pub mod logger;

pub use config::ChatConfig;
pub use error::{ChatError, Result};
pub use logger::init_tracing;
