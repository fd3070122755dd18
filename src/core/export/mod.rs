//! Export orchestration
//!
//! This module provides the export pipeline for photopack, including:
//! - The job state machine ([`ExportJob`], [`ExportState`])
//! - The coordinator that drives a job through its steps
//! - The copy and archive steps
//! - The service that authorizes requests and tracks running jobs

pub mod archive;
pub mod coordinator;
pub mod copy;
pub mod job;
pub mod service;

pub use coordinator::ExportCoordinator;
pub use job::{CopiedFile, ExportJob, ExportState, FailureDetail};
pub use service::ExportService;
