//! Test run pipeline
//!
//! Runs the steps of one device farm test run in order:
//!
//! 1. Package the tests
//! 2. Upload the package and the test spec
//! 3. Schedule the run (its ARN is persisted right away)
//! 4. Wait for the run to finish
//! 5. Report file artifacts
//!
//! Any failing step aborts the pipeline, except artifact reporting.

use anyhow::{Context, Result};
use farmhand_client::DeviceFarm;
use farmhand_core::arn::RunArn;
use farmhand_core::domain::upload::UploadType;
use farmhand_core::poll::JobWatcher;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::package;
use crate::service::{RunCompletion, RunService, UploadService};

/// Summary of a finished pipeline
#[derive(Debug)]
pub struct RunReport {
    pub run_arn: String,
    pub completion: RunCompletion,
    pub artifacts: usize,
}

/// Drives one test run end to end
pub struct TestRunner {
    config: Config,
    uploads: UploadService,
    runs: RunService,
}

impl TestRunner {
    /// Creates a runner whose waits stop early once `cancel` fires
    pub fn new(config: Config, farm: Arc<dyn DeviceFarm>, cancel: CancellationToken) -> Self {
        let upload_watcher = JobWatcher::new(config.upload_poll).with_cancellation(cancel.clone());
        let run_watcher = JobWatcher::new(config.run_poll).with_cancellation(cancel);

        Self {
            uploads: UploadService::new(farm.clone(), upload_watcher),
            runs: RunService::new(farm, run_watcher),
            config,
        }
    }

    /// Executes every step and returns what the run ended as
    pub async fn run(&self) -> Result<RunReport> {
        info!("Step 1/5: creating test package");
        let config = self.config.clone();
        let summary = tokio::task::spawn_blocking(move || package::build(&config))
            .await
            .context("Packaging task panicked")??;

        info!("Step 2/5: uploading test package and test spec");
        let package_arn = self
            .uploads
            .upload_file(
                &self.config.project_arn,
                &summary.path,
                UploadType::AppiumWebNodeTestPackage,
            )
            .await
            .context("Failed to upload test package")?;

        let spec_arn = self
            .uploads
            .upload_file(
                &self.config.project_arn,
                &self.config.path(&self.config.test_spec_file),
                UploadType::AppiumWebNodeTestSpec,
            )
            .await
            .context("Failed to upload test spec")?;

        info!("Step 3/5: scheduling test run");
        let run_arn = self.runs.schedule(&self.config, &package_arn, &spec_arn).await?;
        self.persist_run_arn(&run_arn).await?;

        match run_arn.parse::<RunArn>() {
            Ok(parsed) => info!("Console: {}", parsed.console_url()),
            Err(e) => warn!("{}", e),
        }

        info!("Step 4/5: waiting for test run");
        let completion = self.runs.wait_for_completion(&run_arn).await?;
        match &completion {
            RunCompletion::Completed(_) => info!("Test run completed"),
            RunCompletion::Stopped(run) => warn!("Test run has a problem: {}", run.status),
            RunCompletion::StillRunning(_) => warn!("Test run has not finished yet"),
        }

        info!("Step 5/5: collecting results");
        let artifacts = self.runs.report_artifacts(&run_arn).await;

        Ok(RunReport {
            run_arn,
            completion,
            artifacts,
        })
    }

    async fn persist_run_arn(&self, run_arn: &str) -> Result<()> {
        let path = self.config.path(&self.config.run_arn_file);
        tokio::fs::write(&path, run_arn)
            .await
            .with_context(|| format!("Failed to write run ARN to {}", path.display()))?;
        info!("Run ARN saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::FakeFarm;
    use farmhand_core::domain::run::RunStatus;
    use farmhand_core::domain::upload::UploadStatus;
    use std::path::Path;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("test/specs")).unwrap();
        std::fs::write(root.join("test/specs/snapshot-test.ts"), "it('renders', () => {});").unwrap();
        std::fs::write(root.join("package.json"), "{}").unwrap();
        std::fs::write(root.join("devicefarm-test-spec.yml"), "version: 0.1\n").unwrap();
        dir
    }

    fn config(root: &Path) -> Config {
        let mut config = Config::new(
            "arn:aws:devicefarm:us-west-2:123456789012:project:p".to_string(),
            "arn:aws:devicefarm:us-west-2:123456789012:devicepool:p/d".to_string(),
        );
        config.workdir = root.to_path_buf();
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_pipeline() {
        let dir = workspace();
        let farm = Arc::new(FakeFarm::new());
        farm.script_uploads(&[UploadStatus::Processing, UploadStatus::Succeeded]);
        farm.script_runs(&[RunStatus::Running, RunStatus::Completed]);
        farm.add_artifact("Customer Artifacts", "https://artifacts.example/1");

        let runner = TestRunner::new(config(dir.path()), farm.clone(), CancellationToken::new());
        let report = runner.run().await.unwrap();

        assert_eq!(report.run_arn, "arn:run:1");
        assert!(matches!(report.completion, RunCompletion::Completed(_)));
        assert_eq!(report.artifacts, 1);

        let created = farm.created_uploads();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].upload_type, UploadType::AppiumWebNodeTestPackage);
        assert_eq!(created[1].name, "devicefarm-test-spec.yml");
        assert_eq!(created[1].upload_type, UploadType::AppiumWebNodeTestSpec);

        let scheduled = farm.scheduled();
        assert_eq!(scheduled[0].test.test_package_arn, "arn:upload:1");
        assert_eq!(scheduled[0].test.test_spec_arn.as_deref(), Some("arn:upload:2"));

        let saved = std::fs::read_to_string(dir.path().join("device-farm-run-arn.txt")).unwrap();
        assert_eq!(saved, "arn:run:1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_aborts_before_scheduling() {
        let dir = workspace();
        let farm = Arc::new(FakeFarm::new());
        farm.script_uploads(&[UploadStatus::Failed]);
        farm.set_upload_message("Missing node_modules");

        let runner = TestRunner::new(config(dir.path()), farm.clone(), CancellationToken::new());
        let err = runner.run().await.unwrap_err();

        assert!(format!("{:#}", err).contains("Missing node_modules"));
        assert!(farm.scheduled().is_empty());
        assert!(!dir.path().join("device-farm-run-arn.txt").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_arn_saved_when_wait_fails() {
        let dir = workspace();
        let farm = Arc::new(FakeFarm::new());
        farm.fail_get_run();

        let runner = TestRunner::new(config(dir.path()), farm.clone(), CancellationToken::new());
        assert!(runner.run().await.is_err());

        let saved = std::fs::read_to_string(dir.path().join("device-farm-run-arn.txt")).unwrap();
        assert_eq!(saved, "arn:run:1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_reports_still_running() {
        let dir = workspace();
        let farm = Arc::new(FakeFarm::new());
        farm.script_runs(&[RunStatus::Running; 10]);
        let cancel = CancellationToken::new();

        let runner = TestRunner::new(config(dir.path()), farm.clone(), cancel.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(12)).await;
            cancel.cancel();
        });

        let report = runner.run().await.unwrap();
        canceller.await.unwrap();

        assert!(matches!(report.completion, RunCompletion::StillRunning(_)));
        assert!(farm.get_run_calls() < 10);
    }

    #[tokio::test]
    async fn test_missing_test_directory() {
        let dir = tempfile::tempdir().unwrap();
        let farm = Arc::new(FakeFarm::new());

        let runner = TestRunner::new(config(dir.path()), farm.clone(), CancellationToken::new());
        let err = runner.run().await.unwrap_err();

        assert!(err.to_string().contains("Test directory not found"));
        assert!(farm.created_uploads().is_empty());
    }
}
