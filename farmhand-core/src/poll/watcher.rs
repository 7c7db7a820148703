//! Job watcher
//!
//! Polls a [`StatusSource`] at a fixed interval until the job reaches a
//! terminal status, the attempt bound is exhausted, a fetch fails, or the
//! wait is cancelled. Polling is strictly sequential: one fetch, classify,
//! sleep, repeat. The sleep is a tokio timer and the only point where
//! cancellation is observed.

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{Category, Outcome, PollSettings, StatusSource};

/// Waits for a single job to finish
///
/// Performs at most `settings.max_attempts` fetches (at least one), sleeping
/// `settings.interval` between them. A terminal status returns immediately
/// without a trailing sleep; a transport error returns immediately without
/// retry.
pub async fn await_completion<S, C>(
    handle: &str,
    source: &S,
    classify: C,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Outcome<S::Status, S::Error>
where
    S: StatusSource + ?Sized,
    C: Fn(&S::Status) -> Category,
{
    let max_attempts = settings.effective_attempts();
    let mut attempts: u32 = 0;

    loop {
        let status = match source.fetch_status(handle).await {
            Ok(status) => status,
            Err(e) => return Outcome::TransportError(e),
        };
        attempts += 1;

        let category = classify(&status);
        debug!(
            "Status of {} ({}/{}): {:?} -> {:?}",
            handle, attempts, max_attempts, status, category
        );

        if category.is_terminal() {
            return Outcome::Completed(status);
        }

        if attempts >= max_attempts {
            info!("Gave up waiting for {} after {} attempt(s)", handle, attempts);
            return Outcome::TimedOut(status);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Wait for {} cancelled after {} attempt(s)", handle, attempts);
                return Outcome::Cancelled(status);
            }
            _ = time::sleep(settings.interval) => {}
        }
    }
}

/// Reusable waiter bound to one set of poll settings and a cancellation token
#[derive(Debug, Clone)]
pub struct JobWatcher {
    settings: PollSettings,
    cancel: CancellationToken,
}

impl JobWatcher {
    /// Creates a watcher that can only be cancelled through [`JobWatcher::cancel_token`]
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Ties this watcher to an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// See [`await_completion`]
    pub async fn await_completion<S, C>(
        &self,
        handle: &str,
        source: &S,
        classify: C,
    ) -> Outcome<S::Status, S::Error>
    where
        S: StatusSource + ?Sized,
        C: Fn(&S::Status) -> Category,
    {
        await_completion(handle, source, classify, &self.settings, &self.cancel).await
    }
}
