//! Upload domain types

use serde::{Deserialize, Serialize};

/// An upload slot on the device farm
///
/// Created by `CreateUpload`; the file body is then PUT to `url` and the
/// service processes it asynchronously, reporting progress through `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub arn: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub status: UploadStatus,
    /// Presigned URL accepting a single PUT of the file body
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub upload_type: Option<UploadType>,
    /// Failure description reported by the service
    pub message: Option<String>,
    pub metadata: Option<String>,
    #[serde(default, with = "super::epoch_seconds")]
    pub created: Option<chrono::DateTime<chrono::Utc>>,
}

/// Upload processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Initialized,
    Processing,
    Succeeded,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Initialized => "INITIALIZED",
            UploadStatus::Processing => "PROCESSING",
            UploadStatus::Succeeded => "SUCCEEDED",
            UploadStatus::Failed => "FAILED",
            UploadStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of file being uploaded
///
/// Only the web-test kinds used by the runner are named; anything else the
/// service reports is kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadType {
    AppiumWebNodeTestPackage,
    AppiumWebNodeTestSpec,
    #[serde(other)]
    Other,
}
