//! Check command handler
//!
//! Shows the status, counters and artifacts of a test run, optionally after
//! waiting for it to finish. Exits non-zero when a completed run failed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;
use farmhand_client::{ClientError, DeviceFarm, RunTracker};
use farmhand_core::arn::RunArn;
use farmhand_core::domain::artifact::ArtifactCategory;
use farmhand_core::domain::run::{Run, RunResult, RunStatus};
use farmhand_core::poll::{JobWatcher, Outcome, PollSettings, StatusSource};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// File the runner saves the run ARN to
pub const DEFAULT_ARN_FILE: &str = "device-farm-run-arn.txt";

const WAIT_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub wait: bool,
    pub max_wait_minutes: u64,
}

/// What a status check concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Completed(Option<RunResult>),
    InProgress,
    Stopped,
    Unknown,
}

impl Verdict {
    /// Completed runs whose tests failed or errored fail the command
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Verdict::Completed(Some(RunResult::Failed | RunResult::Errored))
        )
    }
}

/// Uses `arg` when given, otherwise the ARN saved in `arn_file`
pub fn resolve_run_arn(arg: Option<String>, arn_file: &Path) -> Result<String> {
    if let Some(arn) = arg.filter(|a| !a.trim().is_empty()) {
        return Ok(arn.trim().to_string());
    }

    let saved = std::fs::read_to_string(arn_file).ok();
    match saved.as_deref().map(str::trim) {
        Some(arn) if !arn.is_empty() => {
            println!("Read run ARN from {}", arn_file.display().to_string().cyan());
            Ok(arn.to_string())
        }
        _ => anyhow::bail!(
            "A test run ARN is required.\n\
             Usage:\n  farmhand check <RUN_ARN>\n\
             or save the ARN to {}",
            arn_file.display()
        ),
    }
}

/// Handle the check command
pub async fn handle_check(
    farm: &dyn DeviceFarm,
    run_arn: &str,
    options: &CheckOptions,
    cancel: &CancellationToken,
) -> Result<()> {
    if options.wait {
        wait_for_run(farm, run_arn, options.max_wait_minutes, cancel).await?;
    }

    let verdict = check_status(farm, run_arn).await?;
    if verdict.is_failure() {
        anyhow::bail!("Test run did not pass");
    }
    Ok(())
}

/// Waits until the run stops changing or the wait bound is reached
///
/// The caller always follows up with a status check, so a timeout or an
/// interrupt only ends the wait.
async fn wait_for_run(
    farm: &dyn DeviceFarm,
    run_arn: &str,
    max_wait_minutes: u64,
    cancel: &CancellationToken,
) -> Result<()> {
    let settings = PollSettings::for_duration(
        WAIT_INTERVAL,
        Duration::from_secs(max_wait_minutes.saturating_mul(60)),
    );
    println!(
        "Waiting for the test run to finish (up to {} minutes)...",
        max_wait_minutes
    );

    let watcher = JobWatcher::new(settings).with_cancellation(cancel.clone());
    let source = Progress::new(RunTracker::new(farm), settings.effective_attempts());

    match watcher
        .await_completion(run_arn, &source, RunTracker::classify)
        .await
    {
        Outcome::Completed(_) => {
            println!("\nThe test run has finished. Checking results...");
        }
        Outcome::TimedOut(_) => {
            println!("\n{}", "Timed out waiting for the test run.".yellow());
            println!("It may still be running. Checking its current status...");
        }
        Outcome::Cancelled(_) => {
            println!("\n{}", "Wait interrupted. Checking current status...".yellow());
        }
        Outcome::TransportError(e) => {
            return Err(e).context("Failed to fetch test run status");
        }
    }

    Ok(())
}

/// Prints the run and returns the verdict for its status
pub async fn check_status(farm: &dyn DeviceFarm, run_arn: &str) -> Result<Verdict> {
    println!("Checking test run {}", run_arn.dimmed());

    let run = farm
        .get_run(run_arn)
        .await
        .context("Failed to fetch test run")?;

    print_run_details(&run);

    let verdict = match run.status {
        RunStatus::Completed => {
            println!("\n{}", "✓ The test run has completed.".green());
            print_artifacts(farm, run_arn).await;

            match run.result {
                Some(RunResult::Passed) => println!("{}", "All tests passed!".green().bold()),
                Some(RunResult::Failed) => println!("{}", "✗ Some tests failed.".red().bold()),
                Some(RunResult::Errored) => {
                    println!("{}", "✗ The test run hit an error.".red().bold())
                }
                _ => {}
            }
            Verdict::Completed(run.result)
        }
        status if status.is_in_progress() => {
            println!("\n{}", "⏳ The test run is still in progress.".yellow());
            println!("Check again later or open it in the console:");
            match run_arn.parse::<RunArn>() {
                Ok(arn) => println!("  {}", arn.console_url().cyan()),
                Err(_) => println!("  {}", run_arn),
            }
            Verdict::InProgress
        }
        RunStatus::Stopping => {
            println!("\n{}", "The test run is stopping.".yellow());
            Verdict::Stopped
        }
        RunStatus::Stopped => {
            println!("\n{}", "The test run was stopped.".yellow());
            Verdict::Stopped
        }
        status => {
            println!("\n{} {}", "? Unknown status:".yellow(), status);
            Verdict::Unknown
        }
    };

    Ok(verdict)
}

fn print_run_details(run: &Run) {
    let [started, stopped] = [run.started, run.stopped].map(|t| {
        t.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    });

    println!("\n{}", "Test Run:".bold());
    println!("  Name:    {}", run.name.as_deref().unwrap_or("N/A"));
    println!("  Status:  {}", colorize_status(run.status));
    println!(
        "  Result:  {}",
        run.result
            .map(|r| colorize_result(r).to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("  Started: {}", started);
    println!("  Stopped: {}", stopped);

    if let Some(counters) = &run.counters {
        println!("\n{}", "Counters:".bold());
        println!("  Total:   {}", counters.total);
        println!("  Passed:  {}", counters.passed.to_string().green());
        println!("  Failed:  {}", counters.failed.to_string().red());
        println!("  Warned:  {}", counters.warned);
        println!("  Errored: {}", counters.errored);
        println!("  Stopped: {}", counters.stopped);
        println!("  Skipped: {}", counters.skipped);
    }
}

/// Lists file artifacts; failures are reported but do not fail the check
async fn print_artifacts(farm: &dyn DeviceFarm, run_arn: &str) {
    match farm.list_artifacts(run_arn, ArtifactCategory::File).await {
        Ok(artifacts) if artifacts.is_empty() => {
            println!("\n{}", "No artifacts.".dimmed());
        }
        Ok(artifacts) => {
            println!("\n{}", "Artifacts:".bold());
            for artifact in artifacts {
                println!(
                    "  - {}: {}",
                    artifact.name.as_deref().unwrap_or("(unnamed)"),
                    artifact.url.as_deref().unwrap_or("-")
                );
            }
        }
        Err(e) => eprintln!("{} {}", "Failed to list artifacts:".red(), e),
    }
}

fn colorize_status(status: RunStatus) -> ColoredString {
    match status {
        RunStatus::Completed => status.as_str().green(),
        RunStatus::Stopping | RunStatus::Stopped => status.as_str().red(),
        RunStatus::Unknown => status.as_str().dimmed(),
        _ => status.as_str().yellow(),
    }
}

fn colorize_result(result: RunResult) -> ColoredString {
    let text = result.to_string();
    match result {
        RunResult::Passed => text.green(),
        RunResult::Failed | RunResult::Errored => text.red(),
        RunResult::Warned | RunResult::Stopped => text.yellow(),
        _ => text.normal(),
    }
}

/// Prints one progress line per status fetch
struct Progress<S> {
    inner: S,
    max_attempts: u32,
    attempt: AtomicU32,
}

impl<S> Progress<S> {
    fn new(inner: S, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts,
            attempt: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl<'a> StatusSource for Progress<RunTracker<'a>> {
    type Status = Run;
    type Error = ClientError;

    async fn fetch_status(&self, handle: &str) -> Result<Run, ClientError> {
        let run = self.inner.fetch_status(handle).await?;
        let attempt = self.attempt.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[{}/{}] Current status: {}", attempt, self.max_attempts, run.status);
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeFarm;
    use std::io::Write;
    use tokio::time::Instant;

    fn options(wait: bool, max_wait_minutes: u64) -> CheckOptions {
        CheckOptions {
            wait,
            max_wait_minutes,
        }
    }

    #[test]
    fn test_resolve_run_arn_prefers_argument() {
        let arn = resolve_run_arn(Some(" arn:run ".into()), Path::new("/nonexistent")).unwrap();
        assert_eq!(arn, "arn:run");
    }

    #[test]
    fn test_resolve_run_arn_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", FakeFarm::RUN_ARN).unwrap();

        let arn = resolve_run_arn(None, file.path()).unwrap();
        assert_eq!(arn, FakeFarm::RUN_ARN);
    }

    #[test]
    fn test_resolve_run_arn_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_run_arn(None, &dir.path().join(DEFAULT_ARN_FILE)).unwrap_err();
        assert!(err.to_string().contains("Usage"));

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n").unwrap();
        assert!(resolve_run_arn(None, &empty).is_err());
    }

    #[tokio::test]
    async fn test_check_status_verdicts() {
        let cases = [
            (RunStatus::Completed, Some(RunResult::Passed), Verdict::Completed(Some(RunResult::Passed))),
            (RunStatus::Completed, Some(RunResult::Failed), Verdict::Completed(Some(RunResult::Failed))),
            (RunStatus::Running, Some(RunResult::Pending), Verdict::InProgress),
            (RunStatus::Scheduling, None, Verdict::InProgress),
            (RunStatus::Stopping, None, Verdict::Stopped),
            (RunStatus::Stopped, Some(RunResult::Stopped), Verdict::Stopped),
            (RunStatus::Unknown, None, Verdict::Unknown),
        ];

        for (status, result, expected) in cases {
            let farm = FakeFarm::with_runs(&[(status, result)]);
            let verdict = check_status(&farm, FakeFarm::RUN_ARN).await.unwrap();
            assert_eq!(verdict, expected, "{}", status);
        }
    }

    #[test]
    fn test_failure_verdicts() {
        assert!(Verdict::Completed(Some(RunResult::Failed)).is_failure());
        assert!(Verdict::Completed(Some(RunResult::Errored)).is_failure());
        assert!(!Verdict::Completed(Some(RunResult::Warned)).is_failure());
        assert!(!Verdict::Completed(None).is_failure());
        assert!(!Verdict::Stopped.is_failure());
    }

    #[tokio::test]
    async fn test_failed_run_fails_command() {
        let farm = FakeFarm::with_runs(&[(RunStatus::Completed, Some(RunResult::Errored))]);
        let err = handle_check(&farm, FakeFarm::RUN_ARN, &options(false, 30), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("did not pass"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_then_final_check() {
        let farm = FakeFarm::with_runs(&[
            (RunStatus::Running, None),
            (RunStatus::Running, None),
            (RunStatus::Completed, Some(RunResult::Passed)),
        ]);
        let start = Instant::now();

        handle_check(&farm, FakeFarm::RUN_ARN, &options(true, 30), &CancellationToken::new())
            .await
            .unwrap();

        // Three polls, then the final status check
        assert_eq!(farm.get_run_calls(), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout_still_checks() {
        let farm = FakeFarm::with_runs(&[(RunStatus::Running, None)]);
        let start = Instant::now();

        handle_check(&farm, FakeFarm::RUN_ARN, &options(true, 1), &CancellationToken::new())
            .await
            .unwrap();

        // One minute at 10 s intervals is 6 polls, then the final check
        assert_eq!(farm.get_run_calls(), 7);
        assert_eq!(start.elapsed(), Duration::from_secs(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_treats_stopped_as_terminal() {
        let farm = FakeFarm::with_runs(&[(RunStatus::Stopped, Some(RunResult::Stopped))]);

        handle_check(&farm, FakeFarm::RUN_ARN, &options(true, 30), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(farm.get_run_calls(), 2);
    }

    #[tokio::test]
    async fn test_wait_transport_error() {
        let farm = FakeFarm::with_runs(&[]);
        let err = handle_check(&farm, FakeFarm::RUN_ARN, &options(true, 30), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to fetch test run status"));
    }
}
