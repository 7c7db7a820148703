//! Run DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::run::Run;

/// Test type used for browser tests driven by a Node.js Appium client
pub const APPIUM_WEB_NODE: &str = "APPIUM_WEB_NODE";

/// Request to schedule a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRun {
    pub project_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_arn: Option<String>,
    pub device_pool_arn: String,
    pub name: String,
    pub test: ScheduleRunTest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ScheduleRunConfiguration>,
}

/// Test section of a run request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRunTest {
    #[serde(rename = "type")]
    pub test_type: String,
    pub test_package_arn: String,
    /// Required for custom environment mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_spec_arn: Option<String>,
    /// Forwarded to the test host as environment variables
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

/// Device and environment settings for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRunConfiguration {
    pub locale: String,
    pub location: Location,
    pub radios: Radios,
    #[serde(default)]
    pub auxiliary_apps: Vec<String>,
    pub billing_method: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Radios {
    pub wifi: bool,
    pub bluetooth: bool,
    pub nfc: bool,
    pub gps: bool,
}

impl Default for ScheduleRunConfiguration {
    fn default() -> Self {
        Self {
            locale: "en_US".to_string(),
            location: Location {
                latitude: 47.6204,
                longitude: -122.3491,
            },
            radios: Radios {
                wifi: true,
                bluetooth: true,
                nfc: false,
                gps: true,
            },
            auxiliary_apps: Vec::new(),
            billing_method: "METERED".to_string(),
        }
    }
}

/// Response envelope of `ScheduleRun` and `GetRun`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEnvelope {
    pub run: Option<Run>,
}
