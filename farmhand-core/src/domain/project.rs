//! Project and device pool domain types

use serde::{Deserialize, Serialize};

/// A device farm project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub arn: Option<String>,
    pub name: Option<String>,
}

/// A named set of device selection rules inside a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePool {
    pub arn: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub pool_type: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A single device selection rule, e.g. `PLATFORM EQUALS "ANDROID"`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub attribute: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.attribute.as_deref().unwrap_or("?"),
            self.operator.as_deref().unwrap_or("?"),
            self.value.as_deref().unwrap_or("?")
        )
    }
}

/// Finds a project by exact name
pub fn find_project<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.name.as_deref() == Some(name))
}

/// Finds a device pool by exact name
pub fn find_device_pool<'a>(pools: &'a [DevicePool], name: &str) -> Option<&'a DevicePool> {
    pools.iter().find(|p| p.name.as_deref() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Project {
        Project {
            arn: Some(format!("arn:aws:devicefarm:us-west-2:1:project:{}", name)),
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_find_project_matches_exact_name() {
        let projects = vec![project("web"), project("web-mobile")];
        let found = find_project(&projects, "web-mobile").unwrap();
        assert_eq!(found.name.as_deref(), Some("web-mobile"));
        assert!(find_project(&projects, "mobile").is_none());
    }

    #[test]
    fn test_rule_display() {
        let pool: DevicePool = serde_json::from_value(serde_json::json!({
            "name": "mobile-browser-devices",
            "rules": [{ "attribute": "PLATFORM", "operator": "EQUALS", "value": "\"ANDROID\"" }]
        }))
        .unwrap();

        assert_eq!(pool.rules[0].to_string(), "PLATFORM EQUALS \"ANDROID\"");
        assert!(find_device_pool(std::slice::from_ref(&pool), "mobile-browser-devices").is_some());
    }
}
