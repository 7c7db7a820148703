//! Test package builder
//!
//! Produces the zip uploaded as an `APPIUM_WEB_NODE_TEST_PACKAGE`: the test
//! sources, the Node.js project files needed to run them, a generated
//! `devicefarm-config.json` descriptor and the test spec YAML.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::config::Config;
use farmhand_core::dto::run::APPIUM_WEB_NODE;

/// Optional project directories copied into the package
const OPTIONAL_DIRS: &[&str] = &["node_modules"];

/// Optional project files copied into the package
const OPTIONAL_FILES: &[&str] = &["package.json", "tsconfig.json", "wdio.conf.ts"];

const DESCRIPTOR_NAME: &str = "devicefarm-config.json";

/// Package descriptor read by the test host
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Descriptor<'a> {
    test_spec: &'a str,
    test_type: &'a str,
    test_package: DescriptorPackage,
}

#[derive(Debug, Serialize)]
struct DescriptorPackage {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// What the packaging step produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub path: PathBuf,
    /// Archive size in bytes
    pub size: u64,
    /// Number of file entries written
    pub entries: usize,
}

/// Builds the test package described by `config`
///
/// The test directory and the test spec are required; every other project
/// file is skipped with a warning when absent.
pub fn build(config: &Config) -> Result<PackageSummary> {
    let root = &config.workdir;
    let test_dir = config.path(&config.test_dir);
    let test_spec = config.path(&config.test_spec_file);
    let output = config.path(&config.package_file);

    if !test_dir.is_dir() {
        anyhow::bail!("Test directory not found: {}", test_dir.display());
    }
    if !test_spec.is_file() {
        anyhow::bail!("Test spec not found: {}", test_spec.display());
    }

    info!("Creating test package at {}", output.display());

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(9));

    let mut entries = add_directory(&mut writer, root, &test_dir, options)?;

    for dir in OPTIONAL_DIRS {
        let path = root.join(dir);
        if path.is_dir() {
            entries += add_directory(&mut writer, root, &path, options)?;
        } else {
            warn!("{} not found, skipping", dir);
        }
    }

    for name in OPTIONAL_FILES {
        let path = root.join(name);
        if path.is_file() {
            add_file(&mut writer, &path, name, options)?;
            entries += 1;
        } else {
            warn!("{} not found, skipping", name);
        }
    }

    let descriptor = Descriptor {
        test_spec: &config.entry_spec,
        test_type: APPIUM_WEB_NODE,
        test_package: DescriptorPackage { kind: "ZIP" },
    };
    let descriptor = serde_json::to_vec_pretty(&descriptor)?;
    writer.start_file(DESCRIPTOR_NAME, options)?;
    writer.write_all(&descriptor)?;
    entries += 1;

    let spec_name = archive_name(root, &test_spec)?;
    add_file(&mut writer, &test_spec, &spec_name, options)?;
    entries += 1;

    writer.finish().context("Failed to finalize test package")?;

    let size = std::fs::metadata(&output)?.len();
    info!("Test package created: {} ({} bytes, {} entries)", output.display(), size, entries);

    Ok(PackageSummary {
        path: output,
        size,
        entries,
    })
}

/// Adds every file under `dir`, named relative to `root`
///
/// Symlinks are followed and archived under the link's own path, so linked
/// package layouts (pnpm, `npm link`) keep their resolvable names.
fn add_directory(
    writer: &mut ZipWriter<File>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<usize> {
    let mut count = 0;

    for entry in walkdir::WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        let name = archive_name(root, path)?;

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{}/", name), options)?;
        } else if entry.file_type().is_file() {
            add_file(writer, path, &name, options)?;
            count += 1;
        }
    }

    debug!("Added {} file(s) from {}", count, dir.display());
    Ok(count)
}

fn add_file(
    writer: &mut ZipWriter<File>,
    path: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut source =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    writer.start_file(name, options)?;
    io::copy(&mut source, writer).with_context(|| format!("Failed to archive {}", path.display()))?;
    Ok(())
}

/// Zip entry name of `path`: relative to `root`, `/`-separated
fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        anyhow::bail!("{} has no archive name", path.display());
    }
    Ok(parts.join("/"))
}
