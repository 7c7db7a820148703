//! In-memory device farm for command tests

use async_trait::async_trait;
use farmhand_client::{ClientError, DeviceFarm, Result};
use farmhand_core::domain::artifact::{Artifact, ArtifactCategory};
use farmhand_core::domain::project::{DevicePool, Project, Rule};
use farmhand_core::domain::run::{Run, RunResult, RunStatus};
use farmhand_core::domain::upload::Upload;
use farmhand_core::dto::run::ScheduleRun;
use farmhand_core::dto::upload::CreateUpload;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeFarm {
    projects: Vec<Project>,
    pools: Vec<DevicePool>,
    runs: Mutex<VecDeque<(RunStatus, Option<RunResult>)>>,
    get_run_calls: Mutex<u32>,
}

impl FakeFarm {
    pub const PROJECT_ARN: &'static str = "arn:aws:devicefarm:us-west-2:123456789012:project:p1";
    pub const POOL_ARN: &'static str =
        "arn:aws:devicefarm:us-west-2:123456789012:devicepool:p1/d1";
    pub const RUN_ARN: &'static str = "arn:aws:devicefarm:us-west-2:123456789012:run:p1/r1";

    /// One project with two pools, one of them the default pool
    pub fn with_inventory() -> Self {
        Self {
            projects: vec![
                Project {
                    arn: Some("arn:aws:devicefarm:us-west-2:123456789012:project:p0".into()),
                    name: Some("legacy".into()),
                },
                Project {
                    arn: Some(Self::PROJECT_ARN.into()),
                    name: Some("app-main-socar-mobile-test".into()),
                },
            ],
            pools: vec![
                DevicePool {
                    arn: Some("arn:aws:devicefarm:us-west-2:123456789012:devicepool:p1/top".into()),
                    name: Some("Top Devices".into()),
                    description: None,
                    pool_type: Some("CURATED".into()),
                    rules: Vec::new(),
                },
                DevicePool {
                    arn: Some(Self::POOL_ARN.into()),
                    name: Some("mobile-browser-devices".into()),
                    description: Some("Chrome and Safari".into()),
                    pool_type: Some("PRIVATE".into()),
                    rules: vec![Rule {
                        attribute: Some("PLATFORM".into()),
                        operator: Some("EQUALS".into()),
                        value: Some("\"ANDROID\"".into()),
                    }],
                },
            ],
            ..Self::default()
        }
    }

    /// Answers `GetRun` with `statuses` in order, then keeps repeating the last one
    pub fn with_runs(statuses: &[(RunStatus, Option<RunResult>)]) -> Self {
        Self {
            runs: Mutex::new(statuses.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn get_run_calls(&self) -> u32 {
        *self.get_run_calls.lock().unwrap()
    }
}

#[async_trait]
impl DeviceFarm for FakeFarm {
    async fn create_upload(&self, _req: &CreateUpload) -> Result<Upload> {
        Err(ClientError::InvalidRequest("not supported".into()))
    }

    async fn get_upload(&self, _arn: &str) -> Result<Upload> {
        Err(ClientError::InvalidRequest("not supported".into()))
    }

    async fn put_presigned(&self, _url: &str, _body: Vec<u8>) -> Result<()> {
        Err(ClientError::InvalidRequest("not supported".into()))
    }

    async fn schedule_run(&self, _req: &ScheduleRun) -> Result<Run> {
        Err(ClientError::InvalidRequest("not supported".into()))
    }

    async fn get_run(&self, arn: &str) -> Result<Run> {
        *self.get_run_calls.lock().unwrap() += 1;
        let mut runs = self.runs.lock().unwrap();
        let next = if runs.len() > 1 {
            runs.pop_front()
        } else {
            runs.front().copied()
        };
        let (status, result) =
            next.ok_or_else(|| ClientError::api_error(400, "Run was not found"))?;

        Ok(Run {
            arn: Some(arn.to_string()),
            name: Some("Snapshot Test Run".into()),
            status,
            result,
            started: None,
            stopped: None,
            counters: None,
            total_jobs: None,
            completed_jobs: None,
        })
    }

    async fn list_artifacts(&self, _arn: &str, _category: ArtifactCategory) -> Result<Vec<Artifact>> {
        Ok(vec![Artifact {
            arn: None,
            name: Some("Customer Artifacts".into()),
            artifact_type: Some("CUSTOMER_ARTIFACT".into()),
            extension: Some("zip".into()),
            url: Some("https://artifacts.example/1".into()),
        }])
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }

    async fn list_device_pools(&self, project_arn: &str) -> Result<Vec<DevicePool>> {
        if project_arn == Self::PROJECT_ARN {
            Ok(self.pools.clone())
        } else {
            Ok(Vec::new())
        }
    }
}
