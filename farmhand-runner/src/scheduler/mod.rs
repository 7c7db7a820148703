//! Scheduler layer for the runner
//!
//! This layer drives one test run from packaging to results, handing each
//! device farm step to the service layer.

pub mod pipeline;

pub use pipeline::TestRunner;
