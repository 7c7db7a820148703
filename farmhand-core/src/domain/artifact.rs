//! Artifact domain types

use serde::{Deserialize, Serialize};

/// A file produced by a run (logs, screenshots, videos, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub arn: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub artifact_type: Option<String>,
    pub extension: Option<String>,
    /// Presigned download URL
    pub url: Option<String>,
}

/// Artifact category accepted by `ListArtifacts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactCategory {
    Screenshot,
    File,
    Log,
}
