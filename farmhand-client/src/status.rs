//! Status vocabularies and poll sources
//!
//! Uploads and runs report progress with different status words. The
//! classifiers here map each vocabulary onto the poller's categories, and the
//! trackers adapt any [`DeviceFarm`] into a [`StatusSource`].

use async_trait::async_trait;
use farmhand_core::domain::run::{Run, RunStatus};
use farmhand_core::domain::upload::{Upload, UploadStatus};
use farmhand_core::poll::{Category, StatusSource};

use crate::api::DeviceFarm;
use crate::error::ClientError;

/// `SUCCEEDED` succeeds, `FAILED` fails, anything else is still processing
pub fn classify_upload(status: &UploadStatus) -> Category {
    match status {
        UploadStatus::Succeeded => Category::Success,
        UploadStatus::Failed => Category::Failure,
        _ => Category::Pending,
    }
}

/// `COMPLETED` succeeds, `STOPPING`/`STOPPED` fail, anything else is still running
///
/// A completed run may still contain failed tests; inspect [`Run::result`].
pub fn classify_run(status: &RunStatus) -> Category {
    match status {
        RunStatus::Completed => Category::Success,
        RunStatus::Stopping | RunStatus::Stopped => Category::Failure,
        _ => Category::Pending,
    }
}

/// Polls `GetUpload`; the full record is kept so failure messages are available
pub struct UploadTracker<'a> {
    farm: &'a dyn DeviceFarm,
}

impl<'a> UploadTracker<'a> {
    pub fn new(farm: &'a dyn DeviceFarm) -> Self {
        Self { farm }
    }

    pub fn classify(upload: &Upload) -> Category {
        classify_upload(&upload.status)
    }
}

#[async_trait]
impl StatusSource for UploadTracker<'_> {
    type Status = Upload;
    type Error = ClientError;

    async fn fetch_status(&self, handle: &str) -> Result<Upload, ClientError> {
        self.farm.get_upload(handle).await
    }
}

/// Polls `GetRun`
pub struct RunTracker<'a> {
    farm: &'a dyn DeviceFarm,
}

impl<'a> RunTracker<'a> {
    pub fn new(farm: &'a dyn DeviceFarm) -> Self {
        Self { farm }
    }

    pub fn classify(run: &Run) -> Category {
        classify_run(&run.status)
    }
}

#[async_trait]
impl StatusSource for RunTracker<'_> {
    type Status = Run;
    type Error = ClientError;

    async fn fetch_status(&self, handle: &str) -> Result<Run, ClientError> {
        self.farm.get_run(handle).await
    }
}
