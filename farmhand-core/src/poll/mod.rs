//! Job completion polling
//!
//! Remote work (an upload being processed, a test run executing on devices)
//! is tracked by repeatedly asking the service for its status. This module
//! holds the shared pieces of that pattern:
//!
//! - [`StatusSource`]: resolves a job handle to its current status
//! - [`Category`]: caller-supplied bucketing of a status into pending or terminal
//! - [`PollSettings`]: interval and attempt bound
//! - [`Outcome`]: how a wait ended
//!
//! The loop itself lives in [`watcher`].

pub mod watcher;

pub use watcher::{JobWatcher, await_completion};

use async_trait::async_trait;
use std::time::Duration;

/// Capability that queries the remote system once for a job's status
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Service-defined status value
    type Status: std::fmt::Debug + Send;
    /// Transport failure
    type Error: Send;

    /// Fetches the current status of `handle`
    async fn fetch_status(&self, handle: &str) -> Result<Self::Status, Self::Error>;
}

/// Bucket a concrete status falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Keep polling
    Pending,
    /// Terminal, the job did what it was asked
    Success,
    /// Terminal, the job ended unsuccessfully
    Failure,
}

impl Category {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Category::Pending)
    }
}

/// How a wait ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<S, E> {
    /// A terminal status was observed; classify it again to tell success from failure
    Completed(S),
    /// The attempt bound was reached while the job was still pending
    TimedOut(S),
    /// Fetching the status failed; not retried
    TransportError(E),
    /// Cancellation was requested while waiting between attempts
    Cancelled(S),
}

impl<S, E> Outcome<S, E> {
    /// Last status observed before the wait ended, if any was fetched
    pub fn last_status(&self) -> Option<&S> {
        match self {
            Outcome::Completed(s) | Outcome::TimedOut(s) | Outcome::Cancelled(s) => Some(s),
            Outcome::TransportError(_) => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

/// Polling cadence for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between consecutive status fetches
    pub interval: Duration,
    /// Maximum number of fetches; zero behaves like one
    pub max_attempts: u32,
}

impl PollSettings {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Settings that poll every `interval` for roughly `total`
    ///
    /// The attempt bound is rounded up so that at least `total` elapses
    /// before giving up.
    pub fn for_duration(interval: Duration, total: Duration) -> Self {
        let interval_ms = interval.as_millis().max(1);
        let attempts = total.as_millis().div_ceil(interval_ms);
        Self {
            interval,
            max_attempts: u32::try_from(attempts).unwrap_or(u32::MAX).max(1),
        }
    }

    /// Number of fetches a session actually performs at most
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
