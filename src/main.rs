//! CLI entry point for the beatsaver tool.

use std::io::{self, IsTerminal};

use anyhow::Result;
use beatsaver_core::{BeatSaverClient, ClientConfig, RetryPolicy};
use clap::Parser;
use tracing::{debug, info};

mod app;
mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so command output can be piped.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut config = ClientConfig::default()
        .with_api_url(args.api_url.as_str())
        .with_concurrency(usize::from(args.concurrency))
        .with_retry_policy(RetryPolicy::with_max_attempts(u32::from(args.max_retries)));
    if let Some(output) = &args.output {
        config = config.with_output_root(output);
    }
    let concurrency = config.concurrency();
    let client = BeatSaverClient::new(config)?;

    match &args.command {
        Command::Map { key } => commands::run_map_command(&client, key).await?,
        Command::Hash { hash } => commands::run_hash_command(&client, hash).await?,
        Command::User { user } => commands::run_user_command(&client, user).await?,
        Command::Search(search) => commands::run_search_command(&client, search).await?,
        Command::Latest(latest) => commands::run_latest_command(&client, latest).await?,
        Command::Download { keys, json } => {
            let show_progress = !args.quiet && io::stderr().is_terminal();
            commands::run_download_command(&client, keys, concurrency, show_progress, *json)
                .await?;
            info!("Download complete");
        }
        Command::Tags => commands::run_tags_command(),
    }

    Ok(())
}
