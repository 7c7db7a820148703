//! Upload DTOs

use serde::{Deserialize, Serialize};

use crate::domain::upload::{Upload, UploadType};

/// Content type declared on upload creation and sent with the presigned PUT
///
/// A presigned URL is signed over the content type, so both must agree.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Request to create an upload slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpload {
    pub project_arn: String,
    pub name: String,
    #[serde(rename = "type")]
    pub upload_type: UploadType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Response envelope of `CreateUpload` and `GetUpload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadEnvelope {
    pub upload: Option<Upload>,
}
