//! Pools command handler
//!
//! Lists the device pools of a project with their rules.

use anyhow::{Context, Result};
use colored::*;
use farmhand_client::DeviceFarm;
use farmhand_core::domain::project::DevicePool;

use crate::resolver::resolve_project;

/// List every device pool of the named project
pub async fn list_pools(farm: &dyn DeviceFarm, project_name: &str) -> Result<()> {
    let (project, project_arn) = resolve_project(farm, project_name).await?;

    println!(
        "{} {}",
        "Project:".bold(),
        project.name.as_deref().unwrap_or(project_name)
    );
    println!("  ARN: {}", project_arn.cyan());

    let pools = farm
        .list_device_pools(&project_arn)
        .await
        .context("Failed to fetch device pools")?;

    if pools.is_empty() {
        println!("{}", "No device pools found.".yellow());
        return Ok(());
    }

    println!();
    println!("{}", format!("Found {} device pool(s):", pools.len()).bold());
    for (index, pool) in pools.iter().enumerate() {
        print_pool(index + 1, pool);
    }

    println!("\n{}", "Example environment:".bold());
    println!("export DEVICEFARM_PROJECT_ARN=\"{}\"", project_arn);
    println!(
        "export DEVICEFARM_DEVICE_POOL_ARN=\"{}\"",
        pools[0].arn.as_deref().unwrap_or("<device pool ARN>")
    );

    println!("\n{}", "Next steps:".bold());
    println!("  1. Pick a pool from the list above");
    println!("  2. Export its ARN as {}", "DEVICEFARM_DEVICE_POOL_ARN".cyan());
    println!("  3. Start a run with {}", "farmhand-runner".cyan());

    Ok(())
}

fn print_pool(number: usize, pool: &DevicePool) {
    println!();
    println!(
        "{}. {}",
        number,
        pool.name.as_deref().unwrap_or("(unnamed)").bold()
    );
    println!("   ARN:         {}", pool.arn.as_deref().unwrap_or("-").dimmed());
    println!(
        "   Description: {}",
        pool.description.as_deref().unwrap_or("No description")
    );
    if let Some(kind) = &pool.pool_type {
        println!("   Type:        {}", kind);
    }
    println!("   Rules:       {}", pool.rules.len());
    for rule in &pool.rules {
        println!("     - {}", rule);
    }
}
