//! Run-related API operations

use farmhand_core::domain::run::Run;
use farmhand_core::dto::ArnRequest;
use farmhand_core::dto::run::{RunEnvelope, ScheduleRun};

use crate::DeviceFarmClient;
use crate::error::{ClientError, Result};

impl DeviceFarmClient {
    // =============================================================================
    // Runs
    // =============================================================================

    /// Schedule a test run on a device pool
    ///
    /// # Returns
    /// The scheduled run
    pub async fn schedule_run(&self, req: &ScheduleRun) -> Result<Run> {
        let envelope: RunEnvelope = self.call("ScheduleRun", req).await?;
        envelope.run.ok_or(ClientError::MissingField("run"))
    }

    /// Get a run by ARN
    pub async fn get_run(&self, arn: &str) -> Result<Run> {
        let envelope: RunEnvelope = self.call("GetRun", &ArnRequest::new(arn)).await?;
        envelope.run.ok_or(ClientError::MissingField("run"))
    }
}
