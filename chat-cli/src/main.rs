//! chat CLI: manage users and messages in the SQLite store. Config from env and optional CLI args.

use anyhow::{Context, Result};
use chat_cli::{run_command, Cli};
use chat_core::{init_tracing, ChatConfig};
use clap::Parser;
use messaging::MessagingService;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ChatConfig::load(cli.database_url.clone())?;

    init_tracing(&config.log_file)
        .with_context(|| format!("Initialize logging to {}", config.log_file))?;
    info!(database_url = %config.database_url, command = ?cli.command, "Starting chat command");

    let service = MessagingService::connect(&config)
        .await
        .context("Open database (check DATABASE_URL)")?;

    let output = run_command(&service, cli.command).await?;
    println!("{}", output);

    Ok(())
}
