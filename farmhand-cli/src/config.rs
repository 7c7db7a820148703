//! Configuration module
//!
//! Handles CLI configuration including the region, the endpoint override
//! and the cancellation token shared by long waits.

use anyhow::{Context, Result};
use farmhand_client::{Credentials, DeviceFarm, DeviceFarmClient};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Region of the device farm endpoint
    pub region: String,

    /// Endpoint override
    pub endpoint: Option<String>,

    /// Cancelled on Ctrl-C
    pub cancel: CancellationToken,
}

impl Config {
    /// Builds a signed device farm client from the configured region and the
    /// ambient AWS credentials
    pub fn connect(&self) -> Result<Arc<dyn DeviceFarm>> {
        let credentials = Credentials::load().context(
            "Failed to load AWS credentials (run `farmhand credentials` for setup help)",
        )?;

        let mut client = DeviceFarmClient::new(self.region.clone(), credentials)?;
        if let Some(endpoint) = &self.endpoint {
            client = client.with_endpoint(endpoint)?;
        }

        Ok(Arc::new(client))
    }
}
