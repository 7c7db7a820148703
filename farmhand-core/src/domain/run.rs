//! Run domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled test run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub arn: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub status: RunStatus,
    pub result: Option<RunResult>,
    #[serde(default, with = "super::epoch_seconds")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, with = "super::epoch_seconds")]
    pub stopped: Option<DateTime<Utc>>,
    pub counters: Option<Counters>,
    pub total_jobs: Option<u32>,
    pub completed_jobs: Option<u32>,
}

/// Run lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    PendingConcurrency,
    PendingDevice,
    Processing,
    Scheduling,
    Preparing,
    Running,
    Completed,
    Stopping,
    /// Reported by some service versions once a stop request has finished
    Stopped,
    #[default]
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Pending => "PENDING",
            RunStatus::PendingConcurrency => "PENDING_CONCURRENCY",
            RunStatus::PendingDevice => "PENDING_DEVICE",
            RunStatus::Processing => "PROCESSING",
            RunStatus::Scheduling => "SCHEDULING",
            RunStatus::Preparing => "PREPARING",
            RunStatus::Running => "RUNNING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Stopping => "STOPPING",
            RunStatus::Stopped => "STOPPED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the run is still queued or executing on devices
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            RunStatus::Pending
                | RunStatus::PendingConcurrency
                | RunStatus::PendingDevice
                | RunStatus::Processing
                | RunStatus::Scheduling
                | RunStatus::Preparing
                | RunStatus::Running
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate outcome of a run's tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunResult {
    Pending,
    Passed,
    Warned,
    Failed,
    Skipped,
    Errored,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunResult::Pending => "PENDING",
            RunResult::Passed => "PASSED",
            RunResult::Warned => "WARNED",
            RunResult::Failed => "FAILED",
            RunResult::Skipped => "SKIPPED",
            RunResult::Errored => "ERRORED",
            RunResult::Stopped => "STOPPED",
            RunResult::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Per-outcome test counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counters {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub warned: u32,
    pub errored: u32,
    pub stopped: u32,
    pub skipped: u32,
}
