//! Project and device pool API operations

use farmhand_core::domain::project::{DevicePool, Project};
use farmhand_core::dto::listing::{ListDevicePoolsPage, ListProjectsPage, ListRequest};

use crate::DeviceFarmClient;
use crate::error::Result;

impl DeviceFarmClient {
    // =============================================================================
    // Projects & Device Pools
    // =============================================================================

    /// List all projects of the account
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();
        let mut req = ListRequest::default();

        loop {
            let page: ListProjectsPage = self.call("ListProjects", &req).await?;
            projects.extend(page.projects);
            match page.next_token {
                Some(token) => req.next_token = Some(token),
                None => return Ok(projects),
            }
        }
    }

    /// List the device pools of a project
    ///
    /// # Arguments
    /// * `project_arn` - ARN of the project owning the pools
    pub async fn list_device_pools(&self, project_arn: &str) -> Result<Vec<DevicePool>> {
        let mut pools = Vec::new();
        let mut req = ListRequest {
            arn: Some(project_arn.to_string()),
            next_token: None,
        };

        loop {
            let page: ListDevicePoolsPage = self.call("ListDevicePools", &req).await?;
            pools.extend(page.device_pools);
            match page.next_token {
                Some(token) => req.next_token = Some(token),
                None => return Ok(pools),
            }
        }
    }
}
