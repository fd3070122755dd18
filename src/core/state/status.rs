//! Job status snapshot
//!
//! The serializable view of an export job, published after every
//! transition and persisted by the [`StateManager`](super::StateManager).

use crate::core::export::job::{CopiedFile, ExportState, FailureDetail};
use crate::core::validation::ValidationReport;
use crate::domain::ids::{JobId, Principal, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of an export job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Job id
    pub job_id: JobId,

    /// Project being exported
    pub project_id: ProjectId,

    /// Caller that requested the export
    pub principal: Principal,

    /// Current step
    pub state: ExportState,

    /// Percent complete (0-100)
    pub percent_complete: u8,

    /// Files copied
    pub processed_files: usize,

    /// Files planned
    pub total_files: usize,

    /// Delivery name being worked on
    pub current_file: Option<String>,

    /// Failed step, reason and counters (failed jobs only)
    pub failure: Option<FailureDetail>,

    /// Validation report, once the package was validated
    pub validation_report: Option<ValidationReport>,

    /// Deliverable path (completed jobs only)
    pub archive_location: Option<PathBuf>,

    /// Copy manifest, filled once the job is terminal
    #[serde(default)]
    pub copied_files: Vec<CopiedFile>,

    /// When the job was created
    pub created_at: DateTime<Utc>,

    /// Last change
    pub updated_at: DateTime<Utc>,

    /// When the job reached a terminal state
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    /// Whether the job finished successfully
    pub fn is_completed(&self) -> bool {
        self.state == ExportState::Completed
    }

    /// Whether the job can no longer change
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Format the status as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        let icon = match self.state {
            ExportState::Completed => "✅",
            ExportState::Failed => "❌",
            _ => "⏳",
        };
        summary.push_str(&format!("{icon} Export job {}\n", self.job_id));
        summary.push_str(&format!("  Project: {}\n", self.project_id));
        summary.push_str(&format!("  Requested by: {}\n", self.principal));
        summary.push_str(&format!(
            "  State: {} ({}%)\n",
            self.state, self.percent_complete
        ));
        summary.push_str(&format!(
            "  Files: {}/{}\n",
            self.processed_files, self.total_files
        ));
        if let Some(current) = &self.current_file {
            if !self.is_terminal() {
                summary.push_str(&format!("  Current file: {current}\n"));
            }
        }
        if let Some(failure) = &self.failure {
            summary.push_str(&format!("  Failed step: {}\n", failure.step));
            summary.push_str(&format!("  Reason: {}\n", failure.reason));
        }
        if let Some(location) = &self.archive_location {
            summary.push_str(&format!("  Output: {}\n", location.display()));
        }
        if let Some(report) = &self.validation_report {
            summary.push_str(&format!(
                "  Validation: {} error(s), {} warning(s)\n",
                report.errors().len(),
                report.warnings().len()
            ));
        }
        summary.push_str(&format!("  Created: {}\n", self.created_at));
        if let Some(completed) = self.completed_at {
            let duration = completed - self.created_at;
            summary.push_str(&format!(
                "  Duration: {:.2}s\n",
                duration.num_milliseconds() as f64 / 1000.0
            ));
        }
        summary
    }

    /// Log the status
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            project_id = %self.project_id,
            state = %self.state,
            percent = self.percent_complete,
            processed = self.processed_files,
            total = self.total_files,
            "Export job status"
        );

        if let Some(failure) = &self.failure {
            tracing::warn!(
                job_id = %self.job_id,
                step = %failure.step,
                reason = %failure.reason,
                processed = failure.processed_files,
                total = failure.total_files,
                "Export job failed"
            );
        }
    }
}
