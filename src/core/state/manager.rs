//! State manager for job status persistence
//!
//! This module provides the StateManager for loading and saving job status
//! snapshots through a [`StatusStorage`] backend.

use super::storage::StatusStorage;
use super::JobStatus;
use crate::domain::ids::JobId;
use crate::domain::Result;
use std::sync::Arc;

/// State manager for job status persistence
///
/// Status writes from the export pipeline go through [`checkpoint`], which
/// never fails the job: a storage error is logged and dropped.
///
/// [`checkpoint`]: StateManager::checkpoint
pub struct StateManager {
    /// Status storage backend
    storage: Arc<dyn StatusStorage>,
}

impl StateManager {
    /// Create a new StateManager with a status storage backend
    pub fn new_with_storage(storage: Arc<dyn StatusStorage>) -> Self {
        Self { storage }
    }

    /// Load a job's status
    ///
    /// # Errors
    ///
    /// Returns an error if the stored status cannot be read.
    pub async fn load_status(&self, job_id: &JobId) -> Result<Option<JobStatus>> {
        self.storage.load_status(job_id).await
    }

    /// Save a job's status
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn save_status(&self, status: &JobStatus) -> Result<()> {
        self.storage.save_status(status).await
    }

    /// All stored statuses, oldest first
    pub async fn list_statuses(&self) -> Result<Vec<JobStatus>> {
        self.storage.list_statuses().await
    }

    /// Best-effort save used by the pipeline
    pub async fn checkpoint(&self, status: &JobStatus) {
        tracing::debug!(
            job_id = %status.job_id,
            state = %status.state,
            processed = status.processed_files,
            total = status.total_files,
            "Checkpointing job status"
        );

        if let Err(e) = self.save_status(status).await {
            tracing::warn!(
                job_id = %status.job_id,
                error = %e,
                "Failed to persist job status"
            );
        }
    }
}
