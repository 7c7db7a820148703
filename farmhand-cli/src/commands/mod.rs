//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod check;
mod credentials;
mod pools;
mod validate;

use anyhow::Result;
use clap::Subcommand;
use farmhand_client::ClientError;
use std::path::PathBuf;

use crate::config::Config;
use crate::resolver::{DEFAULT_DEVICE_POOL_NAME, DEFAULT_PROJECT_NAME};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the status and results of a test run
    Check {
        /// Run ARN (read from the ARN file when omitted)
        run_arn: Option<String>,

        /// Wait for the run to finish before checking
        #[arg(long, env = "WAIT_FOR_COMPLETION")]
        wait: bool,

        /// Upper bound on the wait
        #[arg(long, default_value_t = 30)]
        max_wait_minutes: u64,

        /// File the runner saved the run ARN to
        #[arg(long, default_value = check::DEFAULT_ARN_FILE)]
        arn_file: PathBuf,
    },
    /// List the device pools of a project
    Pools {
        #[arg(long, env = "DEVICEFARM_PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
        project_name: String,
    },
    /// Verify the project and device pool exist and print their ARNs
    Validate {
        #[arg(long, env = "DEVICEFARM_PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
        project_name: String,

        #[arg(long, env = "DEVICEFARM_DEVICE_POOL_NAME", default_value = DEFAULT_DEVICE_POOL_NAME)]
        pool_name: String,
    },
    /// Look up the project and device pool and print the runner settings
    Setup {
        #[arg(long, env = "DEVICEFARM_PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
        project_name: String,

        #[arg(long, env = "DEVICEFARM_DEVICE_POOL_NAME", default_value = DEFAULT_DEVICE_POOL_NAME)]
        pool_name: String,
    },
    /// Check that AWS credentials are configured
    Credentials {
        /// Where to write a template when credentials are missing
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Check {
            run_arn,
            wait,
            max_wait_minutes,
            arn_file,
        } => {
            let run_arn = check::resolve_run_arn(run_arn, &arn_file)?;
            let farm = config.connect()?;
            let options = check::CheckOptions {
                wait,
                max_wait_minutes,
            };
            check::handle_check(farm.as_ref(), &run_arn, &options, &config.cancel).await
        }
        Commands::Pools { project_name } => {
            let farm = config.connect()?;
            pools::list_pools(farm.as_ref(), &project_name).await
        }
        Commands::Validate {
            project_name,
            pool_name,
        } => {
            let farm = config.connect()?;
            validate::validate(farm.as_ref(), &project_name, &pool_name).await
        }
        Commands::Setup {
            project_name,
            pool_name,
        } => {
            let farm = config.connect()?;
            validate::setup(farm.as_ref(), &project_name, &pool_name).await
        }
        Commands::Credentials { env_file } => credentials::check_credentials(&env_file),
    }
}

/// Suggested next step for a failed command, keyed on the service error in
/// its chain
pub fn hint(err: &anyhow::Error) -> Option<&'static str> {
    let err = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ClientError>())?;

    if err.is_not_found() {
        Some("the ARN or name does not exist in this region; check --region and the ARN")
    } else if err.is_client_error() {
        Some("the request was rejected; run `farmhand credentials` and check the IAM permissions")
    } else if err.is_server_error() {
        Some("the device farm service failed; try again shortly")
    } else {
        match err {
            ClientError::MissingCredentials(_) => Some("run `farmhand credentials` for setup help"),
            ClientError::InvalidRequest(_) => Some("check --region and --endpoint"),
            _ => None,
        }
    }
}
