//! Run ARN parsing
//!
//! Run ARNs have the shape
//! `arn:aws:devicefarm:<region>:<account>:run:<project-id>/<run-id>`.

use std::fmt;
use std::str::FromStr;

/// Components of a run ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArn {
    pub region: String,
    pub account: String,
    pub project_id: String,
    pub run_id: String,
}

/// Error returned when a string is not a run ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRunArn(pub String);

impl fmt::Display for InvalidRunArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a device farm run ARN: {}", self.0)
    }
}

impl std::error::Error for InvalidRunArn {}

impl FromStr for RunArn {
    type Err = InvalidRunArn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidRunArn(s.to_string());

        let parts: Vec<&str> = s.trim().splitn(7, ':').collect();
        if parts.len() != 7 || parts[0] != "arn" || parts[2] != "devicefarm" || parts[5] != "run" {
            return Err(invalid());
        }

        let (project_id, run_id) = parts[6].split_once('/').ok_or_else(invalid)?;
        if project_id.is_empty() || run_id.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            region: parts[3].to_string(),
            account: parts[4].to_string(),
            project_id: project_id.to_string(),
            run_id: run_id.to_string(),
        })
    }
}

impl RunArn {
    /// Link to the run in the service console
    pub fn console_url(&self) -> String {
        format!(
            "https://{region}.console.aws.amazon.com/devicefarm/home?region={region}#/projects/{}/runs/{}",
            self.project_id,
            self.run_id,
            region = self.region
        )
    }
}

impl fmt::Display for RunArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:aws:devicefarm:{}:{}:run:{}/{}",
            self.region, self.account, self.project_id, self.run_id
        )
    }
}
