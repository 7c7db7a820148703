//! Farmhand Runner
//!
//! Packages a WebdriverIO test suite, runs it on a device farm pool and
//! reports the outcome.
//!
//! Architecture:
//! - Configuration: Load settings from environment variables
//! - Package: Build the test package zip
//! - Services: Uploads and runs against the device farm
//! - Scheduler: The end-to-end test run pipeline
//!
//! Ctrl-C stops any wait in progress at its next poll boundary.

mod config;
mod package;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::scheduler::TestRunner;
use crate::service::RunCompletion;
use farmhand_client::{Credentials, DeviceFarm, DeviceFarmClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmhand_runner=info,farmhand_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Farmhand Runner");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: region={}, project_arn={}, device_pool_arn={}",
        config.region, config.project_arn, config.device_pool_arn
    );

    // Initialize device farm client
    let credentials = Credentials::load().context("Failed to load AWS credentials")?;
    let mut client = DeviceFarmClient::new(config.region.clone(), credentials)?;
    if let Some(endpoint) = &config.endpoint {
        client = client.with_endpoint(endpoint)?;
    }
    info!("Device farm client initialized ({})", client.endpoint());
    let farm: Arc<dyn DeviceFarm> = Arc::new(client);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let runner = TestRunner::new(config, farm, cancel);
    match runner.run().await {
        Ok(report) => {
            let run = report.completion.run();
            match &report.completion {
                RunCompletion::Completed(_) => info!(
                    "Test run finished: {} ({}, {} artifact(s))",
                    report.run_arn,
                    run.result.map(|r| r.to_string()).unwrap_or_else(|| "-".into()),
                    report.artifacts
                ),
                RunCompletion::Stopped(_) => {
                    warn!("Test run {} ended as {}", report.run_arn, run.status)
                }
                RunCompletion::StillRunning(_) => {
                    warn!("Test run {} is still {}", report.run_arn, run.status)
                }
            }
            Ok(())
        }
        Err(e) => {
            error!("Test run failed: {:#}", e);
            Err(e)
        }
    }
}

/// Loads configuration from environment variables and validates it
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Cancels `cancel` on the first Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping at the next poll");
            cancel.cancel();
        }
    });
}
