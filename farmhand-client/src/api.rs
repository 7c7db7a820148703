//! Service trait
//!
//! The runner and the CLI depend on [`DeviceFarm`] rather than on the HTTP
//! client directly, so their workflows can run against in-memory fakes.

use async_trait::async_trait;
use farmhand_core::domain::artifact::{Artifact, ArtifactCategory};
use farmhand_core::domain::project::{DevicePool, Project};
use farmhand_core::domain::run::Run;
use farmhand_core::domain::upload::Upload;
use farmhand_core::dto::run::ScheduleRun;
use farmhand_core::dto::upload::CreateUpload;

use crate::DeviceFarmClient;
use crate::error::Result;

/// Operations the farmhand tools need from the device farm
#[async_trait]
pub trait DeviceFarm: Send + Sync {
    async fn create_upload(&self, req: &CreateUpload) -> Result<Upload>;

    async fn get_upload(&self, arn: &str) -> Result<Upload>;

    /// PUT a file body to the presigned URL of an upload
    async fn put_presigned(&self, url: &str, body: Vec<u8>) -> Result<()>;

    async fn schedule_run(&self, req: &ScheduleRun) -> Result<Run>;

    async fn get_run(&self, arn: &str) -> Result<Run>;

    async fn list_artifacts(&self, arn: &str, category: ArtifactCategory) -> Result<Vec<Artifact>>;

    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn list_device_pools(&self, project_arn: &str) -> Result<Vec<DevicePool>>;
}

#[async_trait]
impl DeviceFarm for DeviceFarmClient {
    async fn create_upload(&self, req: &CreateUpload) -> Result<Upload> {
        DeviceFarmClient::create_upload(self, req).await
    }

    async fn get_upload(&self, arn: &str) -> Result<Upload> {
        DeviceFarmClient::get_upload(self, arn).await
    }

    async fn put_presigned(&self, url: &str, body: Vec<u8>) -> Result<()> {
        DeviceFarmClient::put_presigned(self, url, body).await
    }

    async fn schedule_run(&self, req: &ScheduleRun) -> Result<Run> {
        DeviceFarmClient::schedule_run(self, req).await
    }

    async fn get_run(&self, arn: &str) -> Result<Run> {
        DeviceFarmClient::get_run(self, arn).await
    }

    async fn list_artifacts(&self, arn: &str, category: ArtifactCategory) -> Result<Vec<Artifact>> {
        DeviceFarmClient::list_artifacts(self, arn, category).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        DeviceFarmClient::list_projects(self).await
    }

    async fn list_device_pools(&self, project_arn: &str) -> Result<Vec<DevicePool>> {
        DeviceFarmClient::list_device_pools(self, project_arn).await
    }
}
