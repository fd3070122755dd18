//! Export service - entry point for starting and observing jobs
//!
//! Authorization happens here, before a job exists. Each accepted request
//! gets a fresh [`ExportJob`] with its own snapshot, and its status is
//! observable through [`ExportService::status`] while and after it runs.
//! Running jobs are tracked in memory; finished ones are answered from the
//! persisted status snapshots.

use crate::adapters::authz::{AllowListAuthorizer, Authorizer};
use crate::adapters::catalog::{ManifestCatalog, ProjectCatalog};
use crate::adapters::storage::{BinaryStorage, FsBinaryStorage};
use crate::config::PhotopackConfig;
use crate::core::export::coordinator::ExportCoordinator;
use crate::core::export::job::ExportJob;
use crate::core::state::{FileStatusStorage, JobStatus, StateManager};
use crate::domain::ids::{JobId, Principal, ProjectId};
use crate::domain::{PhotopackError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

type JobRegistry = Arc<Mutex<HashMap<JobId, watch::Receiver<JobStatus>>>>;

/// Export service
#[derive(Clone)]
pub struct ExportService {
    config: Arc<PhotopackConfig>,
    catalog: Arc<dyn ProjectCatalog>,
    authorizer: Arc<dyn Authorizer>,
    coordinator: Arc<ExportCoordinator>,
    state_manager: Arc<StateManager>,
    jobs: JobRegistry,
}

impl ExportService {
    /// Create a new export service from its collaborators
    pub fn new(
        config: PhotopackConfig,
        catalog: Arc<dyn ProjectCatalog>,
        authorizer: Arc<dyn Authorizer>,
        storage: Arc<dyn BinaryStorage>,
        state_manager: Arc<StateManager>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            authorizer,
            coordinator: Arc::new(ExportCoordinator::new(storage, Arc::clone(&state_manager))),
            state_manager,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create a service wired to the filesystem collaborators in `config`
    pub fn from_config(config: PhotopackConfig) -> Self {
        let catalog = Arc::new(ManifestCatalog::new(&config.catalog.manifest_dir));
        let authorizer = Arc::new(AllowListAuthorizer::from_config(&config.authorization));
        let storage = Arc::new(FsBinaryStorage::new(&config.storage.root));
        let state_manager = Arc::new(StateManager::new_with_storage(Arc::new(
            FileStatusStorage::new(&config.state.status_dir),
        )));
        Self::new(config, catalog, authorizer, storage, state_manager)
    }

    /// Runs an export to completion and returns its final status
    ///
    /// # Errors
    ///
    /// Returns [`PhotopackError::Authorization`] when the principal may not
    /// export the project and [`PhotopackError::Catalog`] when the snapshot
    /// cannot be loaded. In both cases no job is created. Pipeline failures
    /// are reported through the returned status instead.
    pub async fn request_export(
        &self,
        principal: Principal,
        project_id: ProjectId,
        cancel: watch::Receiver<bool>,
    ) -> Result<JobStatus> {
        let job = self.create_job(principal, project_id).await?;
        let job_id = job.id();
        let status_tx = self.register(&job);
        let status = self.coordinator.run(job, &status_tx, cancel).await;
        unregister(&self.jobs, &job_id);
        Ok(status)
    }

    /// Starts an export on a tokio task
    ///
    /// Authorization and the snapshot load happen before this returns, with
    /// the same errors as [`request_export`](Self::request_export).
    pub async fn spawn_export(
        &self,
        principal: Principal,
        project_id: ProjectId,
        cancel: watch::Receiver<bool>,
    ) -> Result<(JobId, JoinHandle<JobStatus>)> {
        let job = self.create_job(principal, project_id).await?;
        let job_id = job.id();
        let status_tx = self.register(&job);
        let coordinator = Arc::clone(&self.coordinator);
        let jobs = Arc::clone(&self.jobs);

        let handle = tokio::spawn(async move {
            let status = coordinator.run(job, &status_tx, cancel).await;
            unregister(&jobs, &job_id);
            status
        });
        Ok((job_id, handle))
    }

    /// Latest status of a job
    ///
    /// Jobs started by this service are answered from memory; others are
    /// looked up in the persisted snapshots.
    pub async fn status(&self, job_id: &JobId) -> Result<Option<JobStatus>> {
        let live = self
            .lock_jobs()
            .get(job_id)
            .map(|rx| rx.borrow().clone());
        if live.is_some() {
            return Ok(live);
        }
        self.state_manager.load_status(job_id).await
    }

    /// Receiver that sees every status change of a running job
    ///
    /// Returns `None` once the job has finished; use [`status`](Self::status)
    /// for its final state.
    pub fn subscribe(&self, job_id: &JobId) -> Option<watch::Receiver<JobStatus>> {
        self.lock_jobs().get(job_id).cloned()
    }

    /// Configuration the service runs jobs with
    pub fn config(&self) -> &PhotopackConfig {
        &self.config
    }

    async fn create_job(&self, principal: Principal, project_id: ProjectId) -> Result<ExportJob> {
        if !self.authorizer.can_export(&principal, &project_id).await? {
            tracing::warn!(
                principal = %principal,
                project_id = %project_id,
                "Export request denied"
            );
            return Err(PhotopackError::Authorization(format!(
                "{principal} may not export project {project_id}"
            )));
        }

        let snapshot = Arc::new(self.catalog.load_snapshot(&project_id).await?);
        let job = ExportJob::new(project_id, principal, Arc::clone(&self.config), snapshot);
        tracing::info!(job_id = %job.id(), project_id = %job.project_id(), "Export job created");
        Ok(job)
    }

    fn register(&self, job: &ExportJob) -> watch::Sender<JobStatus> {
        let (tx, rx) = watch::channel(job.status());
        self.lock_jobs().insert(job.id(), rx);
        tx
    }

    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<JobId, watch::Receiver<JobStatus>>> {
        lock(&self.jobs)
    }
}

fn lock(jobs: &JobRegistry) -> MutexGuard<'_, HashMap<JobId, watch::Receiver<JobStatus>>> {
    jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unregister(jobs: &JobRegistry, job_id: &JobId) {
    lock(jobs).remove(job_id);
}
