//! Listing DTOs
//!
//! List operations are paginated with an opaque `nextToken`.

use serde::{Deserialize, Serialize};

use crate::domain::artifact::{Artifact, ArtifactCategory};
use crate::domain::project::{DevicePool, Project};

/// Request to list the artifacts of a run, job, suite or test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArtifacts {
    pub arn: String,
    #[serde(rename = "type")]
    pub category: ArtifactCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Request to list projects, or the device pools of a project when `arn` is set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArtifactsPage {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsPage {
    #[serde(default)]
    pub projects: Vec<Project>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDevicePoolsPage {
    #[serde(default)]
    pub device_pools: Vec<DevicePool>,
    pub next_token: Option<String>,
}
