//! Runner configuration
//!
//! Defines all configurable parameters for a test run including the target
//! project and device pool, the files that make up the test package, and
//! the polling cadence for uploads and runs.

use farmhand_core::poll::PollSettings;
use std::path::PathBuf;
use std::time::Duration;

/// Runner configuration
///
/// Intervals and attempt bounds are configurable so slow device pools can
/// be given more time without code changes.
#[derive(Debug, Clone)]
pub struct Config {
    /// Region of the device farm endpoint
    pub region: String,

    /// Endpoint override (e.g., a local proxy)
    pub endpoint: Option<String>,

    /// Project the run is scheduled in
    pub project_arn: String,

    /// Device pool the run executes on
    pub device_pool_arn: String,

    /// Forwarded to the test host when set
    pub applitools_api_key: Option<String>,

    /// Directory the package inputs are read from and outputs written to
    pub workdir: PathBuf,

    /// Test sources, relative to `workdir`
    pub test_dir: PathBuf,

    /// Entry test spec recorded in the package descriptor
    pub entry_spec: String,

    /// Device farm test spec YAML, relative to `workdir`
    pub test_spec_file: PathBuf,

    /// Zip written by the packaging step, relative to `workdir`
    pub package_file: PathBuf,

    /// File the scheduled run ARN is written to, relative to `workdir`
    pub run_arn_file: PathBuf,

    /// Display name of the scheduled run
    pub run_name: String,

    /// How uploads are polled until processed
    pub upload_poll: PollSettings,

    /// How runs are polled until finished
    pub run_poll: PollSettings,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(project_arn: String, device_pool_arn: String) -> Self {
        Self {
            region: farmhand_client::DEFAULT_REGION.to_string(),
            endpoint: None,
            project_arn,
            device_pool_arn,
            applitools_api_key: None,
            workdir: PathBuf::from("."),
            test_dir: PathBuf::from("test"),
            entry_spec: "test/specs/snapshot-test.ts".to_string(),
            test_spec_file: PathBuf::from("devicefarm-test-spec.yml"),
            package_file: PathBuf::from("test-package.zip"),
            run_arn_file: PathBuf::from("device-farm-run-arn.txt"),
            run_name: "Snapshot Test Run".to_string(),
            upload_poll: PollSettings::new(Duration::from_secs(10), 30), // 5 minutes
            run_poll: PollSettings::new(Duration::from_secs(5), 120),    // 10 minutes
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DEVICEFARM_PROJECT_ARN (required)
    /// - DEVICEFARM_DEVICE_POOL_ARN (required)
    /// - AWS_REGION (optional, default: us-west-2)
    /// - APPLITOOLS_API_KEY (optional)
    /// - FARMHAND_ENDPOINT (optional)
    /// - FARMHAND_WORKDIR (optional, default: current directory)
    /// - FARMHAND_UPLOAD_POLL_INTERVAL (optional, seconds, default: 10)
    /// - FARMHAND_UPLOAD_MAX_ATTEMPTS (optional, default: 30)
    /// - FARMHAND_RUN_POLL_INTERVAL (optional, seconds, default: 5)
    /// - FARMHAND_RUN_MAX_ATTEMPTS (optional, default: 120)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let project_arn = var("DEVICEFARM_PROJECT_ARN")
            .ok_or_else(|| anyhow::anyhow!("DEVICEFARM_PROJECT_ARN environment variable not set"))?;

        let device_pool_arn = var("DEVICEFARM_DEVICE_POOL_ARN").ok_or_else(|| {
            anyhow::anyhow!("DEVICEFARM_DEVICE_POOL_ARN environment variable not set")
        })?;

        let mut config = Self::new(project_arn, device_pool_arn);

        if let Some(region) = var("AWS_REGION") {
            config.region = region;
        }
        config.endpoint = var("FARMHAND_ENDPOINT");
        config.applitools_api_key = var("APPLITOOLS_API_KEY");
        if let Some(workdir) = var("FARMHAND_WORKDIR") {
            config.workdir = PathBuf::from(workdir);
        }

        let secs = |name: &str| var(name).and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs);
        let count = |name: &str| var(name).and_then(|s| s.parse::<u32>().ok());

        if let Some(interval) = secs("FARMHAND_UPLOAD_POLL_INTERVAL") {
            config.upload_poll.interval = interval;
        }
        if let Some(attempts) = count("FARMHAND_UPLOAD_MAX_ATTEMPTS") {
            config.upload_poll.max_attempts = attempts;
        }
        if let Some(interval) = secs("FARMHAND_RUN_POLL_INTERVAL") {
            config.run_poll.interval = interval;
        }
        if let Some(attempts) = count("FARMHAND_RUN_MAX_ATTEMPTS") {
            config.run_poll.max_attempts = attempts;
        }

        Ok(config)
    }

    /// Resolves a path relative to the working directory
    pub fn path(&self, relative: &std::path::Path) -> PathBuf {
        self.workdir.join(relative)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.project_arn.starts_with("arn:") {
            anyhow::bail!("project_arn must be an ARN, got '{}'", self.project_arn);
        }

        if !self.device_pool_arn.starts_with("arn:") {
            anyhow::bail!("device_pool_arn must be an ARN, got '{}'", self.device_pool_arn);
        }

        if self.region.is_empty() {
            anyhow::bail!("region cannot be empty");
        }

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                anyhow::bail!("endpoint must start with http:// or https://");
            }
        }

        for (name, poll) in [("upload", &self.upload_poll), ("run", &self.run_poll)] {
            if poll.interval.is_zero() {
                anyhow::bail!("{} poll interval must be greater than 0", name);
            }
            if poll.max_attempts == 0 {
                anyhow::bail!("{} max attempts must be greater than 0", name);
            }
        }

        Ok(())
    }
}
