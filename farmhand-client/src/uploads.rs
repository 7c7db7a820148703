//! Upload-related API operations

use farmhand_core::domain::upload::Upload;
use farmhand_core::dto::ArnRequest;
use farmhand_core::dto::upload::{CreateUpload, OCTET_STREAM, UploadEnvelope};
use tracing::debug;

use crate::DeviceFarmClient;
use crate::error::{ClientError, Result};

impl DeviceFarmClient {
    // =============================================================================
    // Uploads
    // =============================================================================

    /// Create an upload slot
    ///
    /// # Returns
    /// The upload, including the presigned URL the file body must be PUT to
    pub async fn create_upload(&self, req: &CreateUpload) -> Result<Upload> {
        let envelope: UploadEnvelope = self.call("CreateUpload", req).await?;
        envelope.upload.ok_or(ClientError::MissingField("upload"))
    }

    /// Get an upload by ARN
    pub async fn get_upload(&self, arn: &str) -> Result<Upload> {
        let envelope: UploadEnvelope = self.call("GetUpload", &ArnRequest::new(arn)).await?;
        envelope.upload.ok_or(ClientError::MissingField("upload"))
    }

    /// PUT a file body to a presigned upload URL
    ///
    /// The URL carries its own signature, so the request is sent unsigned.
    pub async fn put_presigned(&self, url: &str, body: Vec<u8>) -> Result<()> {
        debug!("Uploading {} bytes to presigned URL", body.len());

        let response = self
            .client
            .put(url)
            .header("content-type", OCTET_STREAM)
            .body(body)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
