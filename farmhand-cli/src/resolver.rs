//! Name resolver module
//!
//! Resolves project and device pool names to the resources (and ARNs) the
//! runner is configured with. When a name does not match, the available
//! names are printed so the user can pick the right one.

use anyhow::{Context, Result, anyhow};
use colored::*;
use farmhand_client::DeviceFarm;
use farmhand_core::domain::project::{DevicePool, Project, find_device_pool, find_project};

/// Project name used when none is given
pub const DEFAULT_PROJECT_NAME: &str = "app-main-socar-mobile-test";

/// Device pool name used when none is given
pub const DEFAULT_DEVICE_POOL_NAME: &str = "mobile-browser-devices";

/// Project and device pool ARNs a test run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub project_arn: String,
    pub device_pool_arn: String,
}

impl Resources {
    /// Shell `export` lines for the runner's environment
    pub fn export_lines(&self) -> [String; 2] {
        [
            format!("export DEVICEFARM_PROJECT_ARN=\"{}\"", self.project_arn),
            format!("export DEVICEFARM_DEVICE_POOL_ARN=\"{}\"", self.device_pool_arn),
        ]
    }

    /// `.env` file lines for the runner's environment
    pub fn dotenv_lines(&self) -> [String; 2] {
        [
            format!("DEVICEFARM_PROJECT_ARN={}", self.project_arn),
            format!("DEVICEFARM_DEVICE_POOL_ARN={}", self.device_pool_arn),
        ]
    }
}

/// Resolve a project by exact name
///
/// # Errors
/// Returns an error if:
/// - No project has that name (the available projects are printed)
/// - The project has no ARN
/// - API call fails
pub async fn resolve_project(farm: &dyn DeviceFarm, name: &str) -> Result<(Project, String)> {
    let projects = farm
        .list_projects()
        .await
        .context("Failed to fetch projects")?;

    let Some(project) = find_project(&projects, name) else {
        println!("{}", "Available projects:".bold());
        for project in &projects {
            println!(
                "  - {}: {}",
                project.name.as_deref().unwrap_or("(unnamed)"),
                project.arn.as_deref().unwrap_or("-").dimmed()
            );
        }
        return Err(anyhow!("Project '{}' not found", name));
    };

    let arn = project
        .arn
        .clone()
        .with_context(|| format!("Project '{}' has no ARN", name))?;

    Ok((project.clone(), arn))
}

/// Resolve a device pool of a project by exact name
///
/// Prints the available pools when none matches.
pub async fn resolve_device_pool(
    farm: &dyn DeviceFarm,
    project_arn: &str,
    name: &str,
) -> Result<(DevicePool, String)> {
    let pools = farm
        .list_device_pools(project_arn)
        .await
        .context("Failed to fetch device pools")?;

    let Some(pool) = find_device_pool(&pools, name) else {
        println!("{}", "Available device pools:".bold());
        for pool in &pools {
            println!(
                "  - {}: {}",
                pool.name.as_deref().unwrap_or("(unnamed)"),
                pool.arn.as_deref().unwrap_or("-").dimmed()
            );
        }
        return Err(anyhow!(
            "Device pool '{}' not found; pick one of the pools listed above",
            name
        ));
    };

    let arn = pool
        .arn
        .clone()
        .with_context(|| format!("Device pool '{}' has no ARN", name))?;

    Ok((pool.clone(), arn))
}

/// Resolve both the project and its device pool
pub async fn resolve_resources(
    farm: &dyn DeviceFarm,
    project_name: &str,
    pool_name: &str,
) -> Result<Resources> {
    let (_, project_arn) = resolve_project(farm, project_name).await?;
    println!("{} project {}", "✓".green(), project_arn.cyan());

    let (_, device_pool_arn) = resolve_device_pool(farm, &project_arn, pool_name).await?;
    println!(
        "{} device pool {} ({})",
        "✓".green(),
        pool_name,
        device_pool_arn.cyan()
    );

    Ok(Resources {
        project_arn,
        device_pool_arn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeFarm;

    #[tokio::test]
    async fn test_resolve_resources() {
        let farm = FakeFarm::with_inventory();

        let resources = resolve_resources(&farm, DEFAULT_PROJECT_NAME, DEFAULT_DEVICE_POOL_NAME)
            .await
            .unwrap();

        assert_eq!(resources.project_arn, FakeFarm::PROJECT_ARN);
        assert_eq!(resources.device_pool_arn, FakeFarm::POOL_ARN);
        assert_eq!(
            resources.export_lines()[1],
            format!("export DEVICEFARM_DEVICE_POOL_ARN=\"{}\"", FakeFarm::POOL_ARN)
        );
        assert_eq!(
            resources.dotenv_lines()[0],
            format!("DEVICEFARM_PROJECT_ARN={}", FakeFarm::PROJECT_ARN)
        );
    }

    #[tokio::test]
    async fn test_missing_project() {
        let farm = FakeFarm::with_inventory();

        let err = resolve_project(&farm, "other-project").await.unwrap_err();
        assert!(err.to_string().contains("'other-project' not found"));
    }

    #[tokio::test]
    async fn test_missing_pool() {
        let farm = FakeFarm::with_inventory();

        let err = resolve_resources(&farm, DEFAULT_PROJECT_NAME, "tablets")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Device pool 'tablets' not found"));
    }
}
