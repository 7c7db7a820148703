//! Core domain types
//!
//! This module contains the entities reported back by the device farm service.
//! They are shared between the runner (which creates uploads and runs) and the
//! CLI (which inspects them). Field names follow the service's camelCase wire format.

pub mod artifact;
pub mod project;
pub mod run;
pub mod upload;

/// Serde adapter for optional timestamps sent as fractional epoch seconds
pub(crate) mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_f64(ts.timestamp_millis() as f64 / 1000.0),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<f64>::deserialize(deserializer)?;
        Ok(secs.and_then(|s| DateTime::from_timestamp_millis((s * 1000.0).round() as i64)))
    }
}
