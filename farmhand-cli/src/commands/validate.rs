//! Validate and setup command handlers
//!
//! Both look up the configured project and device pool. `validate` prints the
//! runner environment in shell and `.env` form; `setup` prints the ARNs and
//! the shell form.

use anyhow::Result;
use colored::*;
use farmhand_client::DeviceFarm;

use crate::resolver::{Resources, resolve_resources};

/// Verify the project and pool exist
pub async fn validate(farm: &dyn DeviceFarm, project_name: &str, pool_name: &str) -> Result<()> {
    println!("Checking device farm resources...");
    let resources = resolve_resources(farm, project_name, pool_name).await?;

    print_exports(&resources);

    println!("\n{}", "Or add to .env:".bold());
    for line in resources.dotenv_lines() {
        println!("{}", line);
    }

    println!("\n{}", "✓ Resources verified!".green().bold());
    Ok(())
}

/// Look up the project and pool and print the runner settings
pub async fn setup(farm: &dyn DeviceFarm, project_name: &str, pool_name: &str) -> Result<()> {
    println!("Setting up device farm resources...");
    let resources = resolve_resources(farm, project_name, pool_name).await?;

    println!("\n{}", "Setup complete!".green().bold());
    println!("  Project ARN:     {}", resources.project_arn.cyan());
    println!("  Device pool ARN: {}", resources.device_pool_arn.cyan());

    print_exports(&resources);
    Ok(())
}

fn print_exports(resources: &Resources) {
    println!("\n{}", "Environment:".bold());
    for line in resources.export_lines() {
        println!("{}", line);
    }
}
