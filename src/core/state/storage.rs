//! Job status storage backends

use super::JobStatus;
use crate::domain::context::ResultExt;
use crate::domain::ids::JobId;
use crate::domain::{PhotopackError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Trait for job status persistence
#[async_trait]
pub trait StatusStorage: Send + Sync {
    /// Load a job's status
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(JobStatus))` if found, `Ok(None)` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored status cannot be read or parsed.
    async fn load_status(&self, job_id: &JobId) -> Result<Option<JobStatus>>;

    /// Save a job's status, replacing any previous one
    async fn save_status(&self, status: &JobStatus) -> Result<()>;

    /// All stored statuses, oldest first
    async fn list_statuses(&self) -> Result<Vec<JobStatus>>;
}

/// Stores each status as `<status_dir>/<job_id>.json`
#[derive(Debug, Clone)]
pub struct FileStatusStorage {
    status_dir: PathBuf,
}

impl FileStatusStorage {
    /// Create a new file status storage
    pub fn new(status_dir: impl Into<PathBuf>) -> Self {
        Self {
            status_dir: status_dir.into(),
        }
    }

    fn path_for(&self, job_id: &JobId) -> PathBuf {
        self.status_dir.join(format!("{job_id}.json"))
    }
}

#[async_trait]
impl StatusStorage for FileStatusStorage {
    async fn load_status(&self, job_id: &JobId) -> Result<Option<JobStatus>> {
        let path = self.path_for(job_id);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PhotopackError::State(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        let status: JobStatus = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid job status file {}", path.display()))?;
        Ok(Some(status))
    }

    async fn save_status(&self, status: &JobStatus) -> Result<()> {
        tokio::fs::create_dir_all(&self.status_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.status_dir.display()))?;

        let path = self.path_for(&status.job_id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(status)?;
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    async fn list_statuses(&self) -> Result<Vec<JobStatus>> {
        let mut entries = match tokio::fs::read_dir(&self.status_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut statuses = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let contents = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<JobStatus>(&contents) {
                Ok(status) => statuses.push(status),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable job status");
                }
            }
        }
        statuses.sort_by_key(|s| s.created_at);
        Ok(statuses)
    }
}

/// Keeps statuses in memory
#[derive(Debug, Default)]
pub struct MemoryStatusStorage {
    statuses: Mutex<HashMap<JobId, JobStatus>>,
}

impl MemoryStatusStorage {
    /// Creates an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<JobId, JobStatus>> {
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StatusStorage for MemoryStatusStorage {
    async fn load_status(&self, job_id: &JobId) -> Result<Option<JobStatus>> {
        Ok(self.lock().get(job_id).cloned())
    }

    async fn save_status(&self, status: &JobStatus) -> Result<()> {
        self.lock().insert(status.job_id, status.clone());
        Ok(())
    }

    async fn list_statuses(&self) -> Result<Vec<JobStatus>> {
        let mut statuses: Vec<JobStatus> = self.lock().values().cloned().collect();
        statuses.sort_by_key(|s| s.created_at);
        Ok(statuses)
    }
}
