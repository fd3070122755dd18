//! Export job state machine
//!
//! An [`ExportJob`] owns one run of the pipeline. Its state only moves
//! forward through [`ExportState::next`], or to [`ExportState::Failed`] from
//! any non-terminal state. A terminal job is never resumed.

use crate::config::PhotopackConfig;
use crate::core::state::JobStatus;
use crate::core::validation::ValidationReport;
use crate::domain::ids::{JobId, Principal, ProjectId};
use crate::domain::photo::ProjectSnapshot;
use crate::domain::{PhotopackError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Pipeline step of an export job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportState {
    /// Pre-flight checks
    Preparing,
    /// Folder plan assembly
    CreatingFolders,
    /// Binary transfers into the staging tree
    CopyingPhotos,
    /// Metadata document build and write
    GeneratingXml,
    /// Validation engine run
    Validating,
    /// Final deliverable materialization
    CreatingArchive,
    /// Terminal success
    Completed,
    /// Terminal failure
    Failed,
}

impl ExportState {
    /// The step after this one on the success path
    pub fn next(self) -> Option<ExportState> {
        use ExportState::*;
        match self {
            Preparing => Some(CreatingFolders),
            CreatingFolders => Some(CopyingPhotos),
            CopyingPhotos => Some(GeneratingXml),
            GeneratingXml => Some(Validating),
            Validating => Some(CreatingArchive),
            CreatingArchive => Some(Completed),
            Completed | Failed => None,
        }
    }

    /// Whether the job can no longer change
    pub fn is_terminal(self) -> bool {
        matches!(self, ExportState::Completed | ExportState::Failed)
    }

    /// Stable kebab-case name
    pub fn as_str(self) -> &'static str {
        match self {
            ExportState::Preparing => "preparing",
            ExportState::CreatingFolders => "creating-folders",
            ExportState::CopyingPhotos => "copying-photos",
            ExportState::GeneratingXml => "generating-xml",
            ExportState::Validating => "validating",
            ExportState::CreatingArchive => "creating-archive",
            ExportState::Completed => "completed",
            ExportState::Failed => "failed",
        }
    }

    /// Percent complete when entering this step
    ///
    /// The copy step spans 10..80 in proportion to files copied.
    pub fn percent(self, processed: usize, total: usize) -> u8 {
        match self {
            ExportState::Preparing => 0,
            ExportState::CreatingFolders => 5,
            ExportState::CopyingPhotos => {
                if total == 0 {
                    10
                } else {
                    let copied = processed.min(total) as u64;
                    (10 + copied * 70 / total as u64) as u8
                }
            }
            ExportState::GeneratingXml => 80,
            ExportState::Validating => 90,
            ExportState::CreatingArchive => 95,
            ExportState::Completed => 100,
            ExportState::Failed => 0,
        }
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and why a job failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    /// Step that was running
    pub step: ExportState,
    /// Human-readable reason
    pub reason: String,
    /// Files copied when the failure happened
    pub processed_files: usize,
    /// Files planned
    pub total_files: usize,
}

/// One file written into the package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedFile {
    /// Delivery name (`P0000001.JPG`)
    pub delivery_name: String,
    /// Path relative to the package root folder
    pub relative_path: String,
    /// Bytes written
    pub bytes: u64,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
}

/// One execution of the export pipeline
#[derive(Debug)]
pub struct ExportJob {
    id: JobId,
    project_id: ProjectId,
    principal: Principal,
    config: Arc<PhotopackConfig>,
    snapshot: Arc<ProjectSnapshot>,
    state: ExportState,
    processed_files: usize,
    total_files: usize,
    current_file: Option<String>,
    failure: Option<FailureDetail>,
    report: Option<ValidationReport>,
    archive_location: Option<PathBuf>,
    copied_files: Vec<CopiedFile>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ExportJob {
    /// Creates a job in `preparing` with a fresh id
    pub fn new(
        project_id: ProjectId,
        principal: Principal,
        config: Arc<PhotopackConfig>,
        snapshot: Arc<ProjectSnapshot>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            project_id,
            principal,
            total_files: snapshot.file_count(),
            config,
            snapshot,
            state: ExportState::Preparing,
            processed_files: 0,
            current_file: None,
            failure: None,
            report: None,
            archive_location: None,
            copied_files: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Job id
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Project being exported
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Configuration snapshot taken at job creation
    pub fn config(&self) -> Arc<PhotopackConfig> {
        Arc::clone(&self.config)
    }

    /// Input snapshot taken at job creation
    pub fn snapshot(&self) -> Arc<ProjectSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Current state
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Failure detail, once failed
    pub fn failure(&self) -> Option<&FailureDetail> {
        self.failure.as_ref()
    }

    /// Validation report, once validated
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    /// Deliverable location, once completed
    pub fn archive_location(&self) -> Option<&PathBuf> {
        self.archive_location.as_ref()
    }

    /// Files copied so far
    pub fn processed_files(&self) -> usize {
        self.processed_files
    }

    /// Files planned
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Moves to `to`, which must be the next step
    ///
    /// # Errors
    ///
    /// Returns [`PhotopackError::Export`] for any other transition.
    pub fn advance(&mut self, to: ExportState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(PhotopackError::Export(format!(
                "Invalid job transition {} -> {}",
                self.state, to
            )));
        }
        self.state = to;
        if to == ExportState::CreatingFolders || to == ExportState::GeneratingXml {
            self.current_file = None;
        }
        self.touch();
        if to.is_terminal() {
            self.completed_at = Some(self.updated_at);
        }
        Ok(())
    }

    /// Moves to `failed`, recording the running step and counters
    ///
    /// Has no effect on a terminal job.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        self.failure = Some(FailureDetail {
            step: self.state,
            reason: reason.into(),
            processed_files: self.processed_files,
            total_files: self.total_files,
        });
        self.state = ExportState::Failed;
        self.touch();
        self.completed_at = Some(self.updated_at);
    }

    /// Sets the planned file count
    pub fn set_total_files(&mut self, total: usize) {
        self.total_files = total;
        self.touch();
    }

    /// Records one finished copy
    pub fn record_copied(&mut self, file: CopiedFile) {
        self.processed_files += 1;
        self.current_file = Some(file.delivery_name.clone());
        self.copied_files.push(file);
        self.touch();
    }

    /// Attaches the validation report
    pub fn set_report(&mut self, report: ValidationReport) {
        self.report = Some(report);
        self.touch();
    }

    /// Records where the deliverable was written
    pub fn set_archive_location(&mut self, location: PathBuf) {
        self.archive_location = Some(location);
        self.touch();
    }

    /// Percent complete
    pub fn percent_complete(&self) -> u8 {
        match &self.failure {
            Some(failure) => failure
                .step
                .percent(failure.processed_files, failure.total_files),
            None => self.state.percent(self.processed_files, self.total_files),
        }
    }

    /// Serializable snapshot of the job
    ///
    /// The copy manifest is only attached once the job is terminal.
    pub fn status(&self) -> JobStatus {
        JobStatus {
            job_id: self.id,
            project_id: self.project_id.clone(),
            principal: self.principal.clone(),
            state: self.state,
            percent_complete: self.percent_complete(),
            processed_files: self.processed_files,
            total_files: self.total_files,
            current_file: self.current_file.clone(),
            failure: self.failure.clone(),
            validation_report: self.report.clone(),
            archive_location: self.archive_location.clone(),
            copied_files: if self.state.is_terminal() {
                self.copied_files.clone()
            } else {
                Vec::new()
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
