//! Artifact-related API operations

use farmhand_core::domain::artifact::{Artifact, ArtifactCategory};
use farmhand_core::dto::listing::{ListArtifacts, ListArtifactsPage};

use crate::DeviceFarmClient;
use crate::error::Result;

impl DeviceFarmClient {
    /// List every artifact of one category under a run, job, suite or test
    ///
    /// Follows `nextToken` until the listing is exhausted.
    pub async fn list_artifacts(&self, arn: &str, category: ArtifactCategory) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        let mut req = ListArtifacts {
            arn: arn.to_string(),
            category,
            next_token: None,
        };

        loop {
            let page: ListArtifactsPage = self.call("ListArtifacts", &req).await?;
            artifacts.extend(page.artifacts);
            match page.next_token {
                Some(token) => req.next_token = Some(token),
                None => return Ok(artifacts),
            }
        }
    }
}
