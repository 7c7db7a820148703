//! Service layer
//!
//! Services contain the device farm steps of a test run. They talk to the
//! service through the [`farmhand_client::DeviceFarm`] trait and wait on
//! remote jobs with a [`farmhand_core::poll::JobWatcher`].

mod run;
mod upload;

pub use run::{RunCompletion, RunService};
pub use upload::UploadService;

#[cfg(test)]
pub(crate) mod fake;
