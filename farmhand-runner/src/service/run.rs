//! Run service
//!
//! Schedules the test run, waits for it to finish and reports the files it
//! produced.

use anyhow::{Context, Result};
use farmhand_client::{DeviceFarm, RunTracker};
use farmhand_core::domain::artifact::ArtifactCategory;
use farmhand_core::domain::run::Run;
use farmhand_core::dto::run::{APPIUM_WEB_NODE, ScheduleRun, ScheduleRunConfiguration, ScheduleRunTest};
use farmhand_core::poll::{Category, JobWatcher, Outcome};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;

/// How waiting for a run ended
#[derive(Debug, Clone)]
pub enum RunCompletion {
    /// The run reached `COMPLETED`; its result may still report failed tests
    Completed(Run),
    /// The run was stopped before completing
    Stopped(Run),
    /// Polling gave up (or was cancelled) while the run was still in progress
    StillRunning(Run),
}

impl RunCompletion {
    pub fn run(&self) -> &Run {
        match self {
            RunCompletion::Completed(run)
            | RunCompletion::Stopped(run)
            | RunCompletion::StillRunning(run) => run,
        }
    }
}

pub struct RunService {
    farm: Arc<dyn DeviceFarm>,
    watcher: JobWatcher,
}

impl RunService {
    pub fn new(farm: Arc<dyn DeviceFarm>, watcher: JobWatcher) -> Self {
        Self { farm, watcher }
    }

    /// Schedules the run and returns its ARN
    pub async fn schedule(
        &self,
        config: &Config,
        test_package_arn: &str,
        test_spec_arn: &str,
    ) -> Result<String> {
        let mut parameters = HashMap::new();
        match &config.applitools_api_key {
            Some(key) => {
                parameters.insert("APPLITOOLS_API_KEY".to_string(), key.clone());
            }
            None => warn!("APPLITOOLS_API_KEY is not set; visual checks will not be uploaded"),
        }

        let request = ScheduleRun {
            project_arn: config.project_arn.clone(),
            app_arn: None,
            device_pool_arn: config.device_pool_arn.clone(),
            name: config.run_name.clone(),
            test: ScheduleRunTest {
                test_type: APPIUM_WEB_NODE.to_string(),
                test_package_arn: test_package_arn.to_string(),
                test_spec_arn: Some(test_spec_arn.to_string()),
                parameters,
            },
            configuration: Some(ScheduleRunConfiguration::default()),
        };

        let run = self
            .farm
            .schedule_run(&request)
            .await
            .context("Failed to schedule test run")?;

        let arn = run.arn.context("Scheduled run has no ARN")?;
        info!("Test run scheduled: {}", arn);
        Ok(arn)
    }

    /// Polls the run until it finishes or the attempt bound is reached
    ///
    /// Only a failed status fetch is an error; a run that outlives the wait
    /// is reported as [`RunCompletion::StillRunning`].
    pub async fn wait_for_completion(&self, run_arn: &str) -> Result<RunCompletion> {
        let tracker = RunTracker::new(self.farm.as_ref());

        info!(
            "Waiting for test run to finish (every {:?}, up to {} checks)",
            self.watcher.settings().interval,
            self.watcher.settings().effective_attempts()
        );

        match self
            .watcher
            .await_completion(run_arn, &tracker, RunTracker::classify)
            .await
        {
            Outcome::Completed(run) => match RunTracker::classify(&run) {
                Category::Success => {
                    info!(
                        "Test run completed with result {}",
                        run.result.map(|r| r.to_string()).unwrap_or_else(|| "-".into())
                    );
                    Ok(RunCompletion::Completed(run))
                }
                _ => {
                    warn!("Test run ended with status {}", run.status);
                    Ok(RunCompletion::Stopped(run))
                }
            },
            Outcome::TimedOut(run) => {
                warn!(
                    "Test run still {} after the wait; check it later with `farmhand check`",
                    run.status
                );
                Ok(RunCompletion::StillRunning(run))
            }
            Outcome::Cancelled(run) => {
                warn!("Stopped waiting for the test run (status {})", run.status);
                Ok(RunCompletion::StillRunning(run))
            }
            Outcome::TransportError(e) => Err(e).context("Failed to check test run status"),
        }
    }

    /// Logs the name and download URL of every file artifact of the run
    ///
    /// Returns the number of artifacts listed. Listing failures are logged
    /// and reported as zero.
    pub async fn report_artifacts(&self, run_arn: &str) -> usize {
        match self.farm.list_artifacts(run_arn, ArtifactCategory::File).await {
            Ok(artifacts) => {
                info!("Test run produced {} file artifact(s)", artifacts.len());
                for artifact in &artifacts {
                    info!(
                        "  {}: {}",
                        artifact.name.as_deref().unwrap_or("(unnamed)"),
                        artifact.url.as_deref().unwrap_or("-")
                    );
                }
                artifacts.len()
            }
            Err(e) => {
                warn!("Failed to list artifacts for {}: {}", run_arn, e);
                0
            }
        }
    }
}
