//! In-memory device farm for service and pipeline tests

use async_trait::async_trait;
use farmhand_client::{ClientError, DeviceFarm, Result};
use farmhand_core::domain::artifact::{Artifact, ArtifactCategory};
use farmhand_core::domain::project::{DevicePool, Project};
use farmhand_core::domain::run::{Run, RunResult, RunStatus};
use farmhand_core::domain::upload::{Upload, UploadStatus};
use farmhand_core::dto::run::ScheduleRun;
use farmhand_core::dto::upload::CreateUpload;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    upload_statuses: VecDeque<UploadStatus>,
    upload_message: Option<String>,
    run_statuses: VecDeque<RunStatus>,
    run_result: Option<RunResult>,
    artifacts: Vec<Artifact>,
    fail_puts: bool,
    fail_get_run: bool,
    fail_artifacts: bool,
    created: Vec<CreateUpload>,
    put_bodies: Vec<Vec<u8>>,
    scheduled: Vec<ScheduleRun>,
    get_upload_calls: u32,
    get_run_calls: u32,
}

/// Scripted [`DeviceFarm`]
///
/// Uploads are numbered `arn:upload:N` in creation order. Status scripts are
/// consumed one fetch at a time; once exhausted the last answer is
/// `SUCCEEDED` for uploads and `COMPLETED` for runs.
#[derive(Default)]
pub struct FakeFarm {
    state: Mutex<State>,
}

impl FakeFarm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_uploads(&self, statuses: &[UploadStatus]) {
        self.state.lock().unwrap().upload_statuses = statuses.iter().copied().collect();
    }

    pub fn set_upload_message(&self, message: &str) {
        self.state.lock().unwrap().upload_message = Some(message.to_string());
    }

    pub fn script_runs(&self, statuses: &[RunStatus]) {
        self.state.lock().unwrap().run_statuses = statuses.iter().copied().collect();
    }

    pub fn set_run_result(&self, result: RunResult) {
        self.state.lock().unwrap().run_result = Some(result);
    }

    pub fn add_artifact(&self, name: &str, url: &str) {
        self.state.lock().unwrap().artifacts.push(Artifact {
            arn: None,
            name: Some(name.to_string()),
            artifact_type: Some("CUSTOMER_ARTIFACT".to_string()),
            extension: None,
            url: Some(url.to_string()),
        });
    }

    pub fn fail_puts(&self) {
        self.state.lock().unwrap().fail_puts = true;
    }

    pub fn fail_get_run(&self) {
        self.state.lock().unwrap().fail_get_run = true;
    }

    pub fn fail_artifacts(&self) {
        self.state.lock().unwrap().fail_artifacts = true;
    }

    pub fn created_uploads(&self) -> Vec<CreateUpload> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn put_bodies(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().put_bodies.clone()
    }

    pub fn scheduled(&self) -> Vec<ScheduleRun> {
        self.state.lock().unwrap().scheduled.clone()
    }

    pub fn get_upload_calls(&self) -> u32 {
        self.state.lock().unwrap().get_upload_calls
    }

    pub fn get_run_calls(&self) -> u32 {
        self.state.lock().unwrap().get_run_calls
    }

    fn run(arn: &str, status: RunStatus, result: Option<RunResult>) -> Run {
        Run {
            arn: Some(arn.to_string()),
            name: Some("Snapshot Test Run".to_string()),
            status,
            result,
            started: None,
            stopped: None,
            counters: None,
            total_jobs: None,
            completed_jobs: None,
        }
    }
}

#[async_trait]
impl DeviceFarm for FakeFarm {
    async fn create_upload(&self, req: &CreateUpload) -> Result<Upload> {
        let mut state = self.state.lock().unwrap();
        state.created.push(req.clone());
        let id = state.created.len();
        Ok(Upload {
            arn: Some(format!("arn:upload:{}", id)),
            name: Some(req.name.clone()),
            status: UploadStatus::Initialized,
            url: Some(format!("https://uploads.example/{}", id)),
            upload_type: Some(req.upload_type),
            message: None,
            metadata: None,
            created: None,
        })
    }

    async fn get_upload(&self, arn: &str) -> Result<Upload> {
        let mut state = self.state.lock().unwrap();
        state.get_upload_calls += 1;
        let status = state
            .upload_statuses
            .pop_front()
            .unwrap_or(UploadStatus::Succeeded);
        Ok(Upload {
            arn: Some(arn.to_string()),
            name: None,
            status,
            url: None,
            upload_type: None,
            message: state.upload_message.clone(),
            metadata: None,
            created: None,
        })
    }

    async fn put_presigned(&self, _url: &str, body: Vec<u8>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_puts {
            return Err(ClientError::api_error(403, "SignatureDoesNotMatch"));
        }
        state.put_bodies.push(body);
        Ok(())
    }

    async fn schedule_run(&self, req: &ScheduleRun) -> Result<Run> {
        self.state.lock().unwrap().scheduled.push(req.clone());
        Ok(Self::run("arn:run:1", RunStatus::Scheduling, None))
    }

    async fn get_run(&self, arn: &str) -> Result<Run> {
        let mut state = self.state.lock().unwrap();
        state.get_run_calls += 1;
        if state.fail_get_run {
            return Err(ClientError::api_error(500, "InternalFailure"));
        }
        let status = state.run_statuses.pop_front().unwrap_or(RunStatus::Completed);
        let result = match status {
            RunStatus::Completed => Some(state.run_result.unwrap_or(RunResult::Passed)),
            _ => Some(RunResult::Pending),
        };
        Ok(Self::run(arn, status, result))
    }

    async fn list_artifacts(&self, _arn: &str, category: ArtifactCategory) -> Result<Vec<Artifact>> {
        let state = self.state.lock().unwrap();
        if state.fail_artifacts {
            return Err(ClientError::api_error(500, "InternalFailure"));
        }
        match category {
            ArtifactCategory::File => Ok(state.artifacts.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(Vec::new())
    }

    async fn list_device_pools(&self, _project_arn: &str) -> Result<Vec<DevicePool>> {
        Ok(Vec::new())
    }
}
