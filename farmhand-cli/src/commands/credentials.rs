//! Credentials command handler
//!
//! Reports missing AWS environment variables and, when any are missing,
//! prints setup instructions and writes a template `.env` file.

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

const REQUIRED_VARS: &[&str] = &["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_REGION"];

const ENV_TEMPLATE: &str = "\
# AWS
AWS_REGION=us-west-2
AWS_ACCESS_KEY_ID=your_access_key_here
AWS_SECRET_ACCESS_KEY=your_secret_key_here

# Device farm (see `farmhand setup`)
DEVICEFARM_PROJECT_ARN=
DEVICEFARM_DEVICE_POOL_ARN=

# Applitools (optional)
APPLITOOLS_API_KEY=your_applitools_api_key_here
";

/// Handle the credentials command against the process environment
pub fn check_credentials(env_file: &Path) -> Result<()> {
    let missing = missing_vars(|name| std::env::var(name).ok());

    if missing.is_empty() {
        println!("{}", "✓ AWS credentials are configured.".green());
        return Ok(());
    }

    println!("{}", "✗ These environment variables are not set:".red());
    for name in &missing {
        println!("   - {}", name);
    }

    print_setup_instructions();
    write_env_template(env_file)?;
    Ok(())
}

/// Required variables that are unset or empty
fn missing_vars<F>(lookup: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    REQUIRED_VARS
        .iter()
        .copied()
        .filter(|name| lookup(name).is_none_or(|v| v.trim().is_empty()))
        .collect()
}

fn print_setup_instructions() {
    println!("\n{}", "Setting up AWS credentials:".bold());
    println!("\n1. With the AWS CLI (recommended):");
    println!("   {}", "aws configure".cyan());
    println!("\n2. With environment variables:");
    println!("   export AWS_ACCESS_KEY_ID=your_access_key_here");
    println!("   export AWS_SECRET_ACCESS_KEY=your_secret_key_here");
    println!("   export AWS_REGION=us-west-2");
    println!("\n3. With a .env file containing the same variables");
    println!("\n4. Check the IAM permissions of the user:");
    for action in [
        "devicefarm:ListProjects",
        "devicefarm:ListDevicePools",
        "devicefarm:CreateUpload",
        "devicefarm:GetUpload",
        "devicefarm:ScheduleRun",
        "devicefarm:GetRun",
        "devicefarm:ListArtifacts",
    ] {
        println!("   - {}", action);
    }
    println!("\nThen try again with {}", "farmhand pools".cyan());
}

/// Writes the template unless the file already exists
///
/// Returns whether a file was written.
fn write_env_template(path: &Path) -> Result<bool> {
    if path.exists() {
        println!("\n{} {} already exists", "!".yellow(), path.display());
        return Ok(false);
    }

    fs::write(path, ENV_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("\n  {} {}", "Created".green(), path.display());
    println!("  Edit it to add your AWS credentials.");
    Ok(true)
}
