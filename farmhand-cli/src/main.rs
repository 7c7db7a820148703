//! Farmhand CLI
//!
//! Command-line interface for inspecting device farm projects, device pools
//! and test runs.

mod commands;
mod config;
mod resolver;

#[cfg(test)]
mod fake;

use anyhow::Result;
use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "farmhand")]
#[command(about = "Device farm test run CLI", long_about = None)]
struct Cli {
    /// Region of the device farm endpoint
    #[arg(long, env = "AWS_REGION", default_value = farmhand_client::DEFAULT_REGION)]
    region: String,

    /// Endpoint override (e.g., a local proxy)
    #[arg(long, env = "FARMHAND_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmhand_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let config = Config {
        region: cli.region,
        endpoint: cli.endpoint,
        cancel,
    };

    let result = handle_command(cli.command, &config).await;
    if let Err(err) = &result
        && let Some(hint) = commands::hint(err)
    {
        eprintln!("{} {}", "hint:".yellow().bold(), hint);
    }
    result
}
