//! Data Transfer Objects for the device farm API
//!
//! Request bodies and response envelopes of the JSON operations the client
//! calls. Field names use the service's camelCase wire format.

pub mod listing;
pub mod run;
pub mod upload;

use serde::{Deserialize, Serialize};

/// Request body for operations addressed by a single ARN (`GetUpload`, `GetRun`, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArnRequest {
    pub arn: String,
}

impl ArnRequest {
    pub fn new(arn: impl Into<String>) -> Self {
        Self { arn: arn.into() }
    }
}
