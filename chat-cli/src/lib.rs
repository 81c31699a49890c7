//! # chat-cli
//!
//! Argument parsing and command dispatch for the `chat` binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::run_command;
