//! Upload service
//!
//! Uploading a file is three steps: create the upload slot, PUT the bytes to
//! its presigned URL, then wait for the service to finish processing it.

use anyhow::{Context, Result};
use farmhand_client::{DeviceFarm, UploadTracker};
use farmhand_core::domain::upload::UploadType;
use farmhand_core::dto::upload::{CreateUpload, OCTET_STREAM};
use farmhand_core::poll::{Category, JobWatcher, Outcome};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct UploadService {
    farm: Arc<dyn DeviceFarm>,
    watcher: JobWatcher,
}

impl UploadService {
    pub fn new(farm: Arc<dyn DeviceFarm>, watcher: JobWatcher) -> Self {
        Self { farm, watcher }
    }

    /// Uploads `path` into `project_arn` and returns the processed upload's ARN
    pub async fn upload_file(
        &self,
        project_arn: &str,
        path: &Path,
        upload_type: UploadType,
    ) -> Result<String> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?;

        let body = tokio::fs::read(path)
            .await
            .with_context(|| format!("File not found: {}", path.display()))?;

        info!("Uploading {} ({} bytes)", name, body.len());

        let upload = self
            .farm
            .create_upload(&CreateUpload {
                project_arn: project_arn.to_string(),
                name: name.clone(),
                upload_type,
                content_type: Some(OCTET_STREAM.to_string()),
            })
            .await
            .with_context(|| format!("Failed to create upload for {}", name))?;

        let arn = upload
            .arn
            .with_context(|| format!("Upload for {} has no ARN", name))?;
        let url = upload
            .url
            .with_context(|| format!("Upload for {} has no presigned URL", name))?;

        debug!("Created upload {}", arn);

        self.farm
            .put_presigned(&url, body)
            .await
            .with_context(|| format!("Failed to upload {}", name))?;

        self.wait_until_processed(&arn, &name).await?;

        info!("Uploaded {}: {}", name, arn);
        Ok(arn)
    }

    async fn wait_until_processed(&self, arn: &str, name: &str) -> Result<()> {
        let tracker = UploadTracker::new(self.farm.as_ref());

        match self
            .watcher
            .await_completion(arn, &tracker, UploadTracker::classify)
            .await
        {
            Outcome::Completed(upload) => match UploadTracker::classify(&upload) {
                Category::Success => Ok(()),
                _ => anyhow::bail!(
                    "Upload of {} failed: {}",
                    name,
                    upload.message.as_deref().unwrap_or("unknown error")
                ),
            },
            Outcome::TimedOut(upload) => anyhow::bail!(
                "Timed out waiting for {} to be processed (last status: {})",
                name,
                upload.status
            ),
            Outcome::Cancelled(_) => anyhow::bail!("Cancelled while waiting for {}", name),
            Outcome::TransportError(e) => {
                Err(e).with_context(|| format!("Failed to check upload status of {}", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fake::FakeFarm;
    use farmhand_core::domain::upload::UploadStatus;
    use farmhand_core::poll::PollSettings;
    use std::time::Duration;

    fn watcher(max_attempts: u32) -> JobWatcher {
        JobWatcher::new(PollSettings::new(Duration::from_secs(10), max_attempts))
    }

    fn package(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("test-package.zip");
        std::fs::write(&path, b"zip-bytes").unwrap();
        path
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_file_happy_path() {
        let dir = tempfile::tempdir().unwrap();
        let farm = Arc::new(FakeFarm::new());
        farm.script_uploads(&[UploadStatus::Processing, UploadStatus::Succeeded]);
        let service = UploadService::new(farm.clone(), watcher(30));

        let arn = service
            .upload_file("arn:project", &package(&dir), UploadType::AppiumWebNodeTestPackage)
            .await
            .unwrap();

        assert_eq!(arn, "arn:upload:1");
        let created = farm.created_uploads();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "test-package.zip");
        assert_eq!(created[0].upload_type, UploadType::AppiumWebNodeTestPackage);
        assert_eq!(
            created[0].content_type.as_deref(),
            Some("application/octet-stream")
        );
        assert_eq!(farm.put_bodies(), vec![b"zip-bytes".to_vec()]);
        assert_eq!(farm.get_upload_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_carries_service_message() {
        let dir = tempfile::tempdir().unwrap();
        let farm = Arc::new(FakeFarm::new());
        farm.script_uploads(&[UploadStatus::Failed]);
        farm.set_upload_message("Invalid test spec");
        let service = UploadService::new(farm.clone(), watcher(30));

        let err = service
            .upload_file("arn:project", &package(&dir), UploadType::AppiumWebNodeTestSpec)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid test spec"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_timeout_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let farm = Arc::new(FakeFarm::new());
        farm.script_uploads(&[UploadStatus::Processing, UploadStatus::Processing]);
        let service = UploadService::new(farm.clone(), watcher(2));

        let err = service
            .upload_file("arn:project", &package(&dir), UploadType::AppiumWebNodeTestPackage)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Timed out"));
        assert!(err.to_string().contains("PROCESSING"));
        assert_eq!(farm.get_upload_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_put_stops_before_polling() {
        let dir = tempfile::tempdir().unwrap();
        let farm = Arc::new(FakeFarm::new());
        farm.fail_puts();
        let service = UploadService::new(farm.clone(), watcher(30));

        let err = service
            .upload_file("arn:project", &package(&dir), UploadType::AppiumWebNodeTestPackage)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("403"));
        assert_eq!(farm.get_upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let farm = Arc::new(FakeFarm::new());
        let service = UploadService::new(farm.clone(), watcher(30));

        let err = service
            .upload_file(
                "arn:project",
                Path::new("/nonexistent/test-package.zip"),
                UploadType::AppiumWebNodeTestPackage,
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("File not found"));
        assert!(farm.created_uploads().is_empty());
    }
}
