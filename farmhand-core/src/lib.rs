//! Farmhand Core
//!
//! Core types and abstractions shared by the farmhand tools.
//!
//! This crate contains:
//! - Domain types: remote entities reported by the device farm (uploads, runs, artifacts, ...)
//! - DTOs: request bodies sent to the device farm API
//! - ARN helpers for run identifiers
//! - The job completion poller used to wait for uploads and runs

pub mod arn;
pub mod domain;
pub mod dto;
pub mod poll;
