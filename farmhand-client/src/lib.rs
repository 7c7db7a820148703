//! Farmhand Device Farm Client
//!
//! A small, type-safe client for the AWS Device Farm JSON API.
//!
//! The runner and the CLI both talk to the service through this crate. Every
//! operation is a signed `POST /` carrying an `X-Amz-Target` header and a JSON
//! body; the response body is JSON as well.
//!
//! # Example
//!
//! ```no_run
//! use farmhand_client::{Credentials, DeviceFarmClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DeviceFarmClient::new("us-west-2", Credentials::load()?)?;
//!
//!     for project in client.list_projects().await? {
//!         println!("{:?}: {:?}", project.name, project.arn);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod credentials;
pub mod error;
pub mod signing;
pub mod status;

mod artifacts;
mod projects;
mod runs;
mod uploads;

// Re-export commonly used types
pub use api::DeviceFarm;
pub use credentials::Credentials;
pub use error::{ClientError, Result};
pub use status::{RunTracker, UploadTracker, classify_run, classify_upload};

use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::signing::{CanonicalInput, Signer};

/// Region the service is hosted in when none is configured
pub const DEFAULT_REGION: &str = "us-west-2";

const SERVICE: &str = "devicefarm";
const TARGET_PREFIX: &str = "DeviceFarm_20150623";
const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// HTTP client for the Device Farm API
///
/// Methods are organized into logical groups:
/// - Uploads (create, inspect, PUT file bodies to presigned URLs)
/// - Runs (schedule, inspect)
/// - Artifacts of a run
/// - Projects and device pools
#[derive(Debug, Clone)]
pub struct DeviceFarmClient {
    /// Endpoint requests are POSTed to (e.g., "https://devicefarm.us-west-2.amazonaws.com/")
    endpoint: Url,
    region: String,
    signer: Signer,
    /// HTTP client instance
    client: Client,
}

impl DeviceFarmClient {
    /// Create a client for the regional endpoint
    ///
    /// # Example
    /// ```
    /// use farmhand_client::{Credentials, DeviceFarmClient};
    ///
    /// let client = DeviceFarmClient::new("us-west-2", Credentials::new("AKID", "secret")).unwrap();
    /// assert_eq!(client.endpoint(), "https://devicefarm.us-west-2.amazonaws.com/");
    /// ```
    pub fn new(region: impl Into<String>, credentials: Credentials) -> Result<Self> {
        Self::with_client(region, credentials, Client::new())
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// Fails when `region` is not a valid region name.
    pub fn with_client(
        region: impl Into<String>,
        credentials: Credentials,
        client: Client,
    ) -> Result<Self> {
        let region = region.into();
        let endpoint = regional_endpoint(&region)?;
        Ok(Self {
            endpoint,
            signer: Signer::new(credentials, region.clone(), SERVICE),
            region,
            client,
        })
    }

    /// Point the client at a different endpoint (a proxy or a local fake)
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        if url.host_str().is_none() {
            return Err(ClientError::InvalidRequest(format!(
                "endpoint '{}' has no host",
                endpoint
            )));
        }
        self.endpoint = url;
        Ok(self)
    }

    /// Get the endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    // =============================================================================
    // Request Dispatch
    // =============================================================================

    /// Send one signed JSON operation and decode its response
    async fn call<Req, Resp>(&self, operation: &str, req: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_vec(req)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode {}: {}", operation, e)))?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let host = host_header(&self.endpoint);

        let signed = self.signer.sign(
            &CanonicalInput {
                method: "POST",
                path: self.endpoint.path(),
                query: self.endpoint.query().unwrap_or(""),
                headers: &[
                    ("content-type", JSON_CONTENT_TYPE),
                    ("host", host.as_str()),
                    ("x-amz-target", target.as_str()),
                ],
                payload: &body,
            },
            chrono::Utc::now(),
        );

        debug!("Calling {} ({} bytes)", target, body.len());

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", JSON_CONTENT_TYPE)
            .header("x-amz-target", &target)
            .header("x-amz-date", &signed.amz_date)
            .header("authorization", &signed.authorization);
        if let Some(token) = &signed.security_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request.body(body).send().await?;
        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_body(status.as_u16(), &error_text));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., presigned PUTs)
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// Endpoint of `region`; region names are lowercase letters, digits and dashes
fn regional_endpoint(region: &str) -> Result<Url> {
    let valid = !region.is_empty()
        && !region.starts_with('-')
        && !region.ends_with('-')
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(ClientError::InvalidRequest(format!(
            "invalid region '{}'",
            region
        )));
    }

    let raw = format!("https://{}.{}.amazonaws.com/", SERVICE, region);
    Url::parse(&raw)
        .map_err(|e| ClientError::InvalidRequest(format!("invalid region '{}': {}", region, e)))
}

/// Value of the `Host` header reqwest will send for `url`
fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
