//! Export coordinator - drives one job through the pipeline
//!
//! The coordinator walks the job's state table one step at a time. Between
//! steps it checks the cancellation signal, publishes a status snapshot and
//! checkpoints it. It is the only place where an error becomes a job-level
//! failure.

use crate::adapters::storage::BinaryStorage;
use crate::core::assembly::{Assembler, FolderPlan, PackageLayout};
use crate::core::export::archive;
use crate::core::export::copy::copy_entries;
use crate::core::export::job::{ExportJob, ExportState};
use crate::core::metadata::{xml, MetadataBuilder, PackageMetadataDocument};
use crate::core::naming::{SequenceNameGenerator, MAX_SEQUENCE};
use crate::core::state::{JobStatus, StateManager};
use crate::core::validation::{ClassificationCodes, PackageView, ValidationEngine};
use crate::domain::context::ResultExt;
use crate::domain::{PhotopackError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Per-job working state
///
/// Every job gets its own generator, assembler and engine, so concurrent
/// jobs share nothing mutable.
struct JobContext {
    generator: SequenceNameGenerator,
    assembler: Assembler,
    metadata: MetadataBuilder,
    engine: ValidationEngine,
    layout: PackageLayout,
    output_dir: PathBuf,
    staging: PathBuf,
    plan: Option<FolderPlan>,
    document: Option<PackageMetadataDocument>,
}

/// Export coordinator
pub struct ExportCoordinator {
    storage: Arc<dyn BinaryStorage>,
    state_manager: Arc<StateManager>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(storage: Arc<dyn BinaryStorage>, state_manager: Arc<StateManager>) -> Self {
        Self {
            storage,
            state_manager,
        }
    }

    /// Runs `job` to a terminal state and returns its final status
    ///
    /// Failures never surface as `Err`: they end the job in `failed` with
    /// the step, reason and counters recorded in the status.
    pub async fn run(
        &self,
        mut job: ExportJob,
        status_tx: &watch::Sender<JobStatus>,
        cancel: watch::Receiver<bool>,
    ) -> JobStatus {
        let config = job.config();
        let layout = PackageLayout::from_config(&config.package);
        let output_dir = PathBuf::from(&config.export.output_dir);
        let mut ctx = JobContext {
            generator: SequenceNameGenerator::new(),
            assembler: Assembler::new(
                layout.clone(),
                config.classification.recognized_categories.clone(),
                config.package.default_photo_extension.clone(),
            ),
            metadata: MetadataBuilder::from_config(&config.package),
            engine: ValidationEngine::standard(ClassificationCodes::from_config(
                &config.classification,
            )),
            staging: archive::staging_dir(&output_dir, job.id()),
            output_dir,
            layout,
            plan: None,
            document: None,
        };

        tracing::info!(
            job_id = %job.id(),
            project_id = %job.project_id(),
            total_files = job.total_files(),
            "Starting export job"
        );
        self.publish(&job, status_tx).await;

        while !job.state().is_terminal() {
            let step = job.state();

            let cancelled = *cancel.borrow();
            let outcome = if cancelled {
                Err(PhotopackError::Cancelled(format!("Export cancelled before {step}")))
            } else {
                self.run_step(step, &mut job, &mut ctx, status_tx, &cancel)
                    .await
            };

            let outcome = outcome.and_then(|()| match step.next() {
                Some(next) => job.advance(next),
                None => Ok(()),
            });

            match outcome {
                Ok(()) => {
                    crate::log_step_transition!(job.id(), step, job.state());
                }
                Err(e) => {
                    crate::log_error_with_context!(&e, format!("job {} step {step}", job.id()));
                    job.fail(e.to_string());
                    archive::remove_staging(&ctx.staging).await;
                }
            }
            self.publish(&job, status_tx).await;
        }

        let status = job.status();
        status.log_summary();
        status
    }

    async fn run_step(
        &self,
        step: ExportState,
        job: &mut ExportJob,
        ctx: &mut JobContext,
        status_tx: &watch::Sender<JobStatus>,
        cancel: &watch::Receiver<bool>,
    ) -> Result<()> {
        match step {
            ExportState::Preparing => self.prepare(job, ctx).await,
            ExportState::CreatingFolders => self.create_folders(job, ctx).await,
            ExportState::CopyingPhotos => self.copy_files(job, ctx, status_tx, cancel).await,
            ExportState::GeneratingXml => self.generate_xml(job, ctx).await,
            ExportState::Validating => self.validate(job, ctx),
            ExportState::CreatingArchive => self.create_archive(job, ctx).await,
            ExportState::Completed | ExportState::Failed => Ok(()),
        }
    }

    /// Pre-flight: configuration, sequence capacity, unique IDs and a free target
    async fn prepare(&self, job: &mut ExportJob, ctx: &mut JobContext) -> Result<()> {
        job.config()
            .validate()
            .map_err(PhotopackError::Configuration)?;

        let snapshot = job.snapshot();
        for (category, count) in [
            ("photo", snapshot.photos.len()),
            ("drawing", snapshot.drawings.len()),
        ] {
            if count > MAX_SEQUENCE as usize {
                return Err(PhotopackError::Configuration(format!(
                    "{count} {category} files exceed the sequence limit of {MAX_SEQUENCE}"
                )));
            }
        }

        if let Some(id) = snapshot.first_duplicate_id() {
            return Err(PhotopackError::Configuration(format!(
                "Snapshot lists file ID '{id}' more than once"
            )));
        }

        tokio::fs::create_dir_all(&ctx.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", ctx.output_dir.display()))?;
        archive::ensure_target_free(
            job.config().package.output_form,
            &ctx.output_dir,
            &ctx.layout,
            job.project_id(),
        )
        .await
    }

    async fn create_folders(&self, job: &mut ExportJob, ctx: &mut JobContext) -> Result<()> {
        let snapshot = job.snapshot();
        let plan = ctx.assembler.assemble(&snapshot, &mut ctx.generator)?;
        job.set_total_files(plan.total_files());

        archive::create_staging(&ctx.staging, &ctx.layout, plan.has_drawings()).await?;

        tracing::info!(
            job_id = %job.id(),
            photos = plan.photos.len(),
            drawings = plan.drawings.len(),
            staging = %ctx.staging.display(),
            "Folder plan assembled"
        );
        ctx.plan = Some(plan);
        Ok(())
    }

    async fn copy_files(
        &self,
        job: &mut ExportJob,
        ctx: &mut JobContext,
        status_tx: &watch::Sender<JobStatus>,
        cancel: &watch::Receiver<bool>,
    ) -> Result<()> {
        let plan = ctx.plan.as_ref().ok_or_else(|| missing("folder plan"))?;
        let entries: Vec<_> = plan.entries().cloned().collect();
        let config = job.config();
        let job_id = job.id();
        let total = entries.len();

        copy_entries(
            Arc::clone(&self.storage),
            entries,
            &ctx.staging,
            &config.export,
            cancel,
            |file| {
                job.record_copied(file.clone());
                crate::log_copy_progress!(job_id, file.delivery_name, job.processed_files(), total);
                status_tx.send_replace(job.status());
            },
        )
        .await?;
        Ok(())
    }

    async fn generate_xml(&self, job: &mut ExportJob, ctx: &mut JobContext) -> Result<()> {
        let plan = ctx.plan.as_ref().ok_or_else(|| missing("folder plan"))?;
        let snapshot = job.snapshot();
        let document = ctx.metadata.build(plan, &snapshot)?;
        let bytes = xml::to_xml(&document)?;
        let path = archive::write_metadata(&ctx.staging, &ctx.layout, &bytes).await?;

        tracing::info!(
            job_id = %job.id(),
            records = document.photos.len(),
            path = %path.display(),
            "Metadata document written"
        );
        ctx.document = Some(document);
        Ok(())
    }

    /// Runs the engine and applies the configured acceptance policy
    fn validate(&self, job: &mut ExportJob, ctx: &mut JobContext) -> Result<()> {
        let plan = ctx.plan.as_ref().ok_or_else(|| missing("folder plan"))?;
        let document = ctx
            .document
            .as_ref()
            .ok_or_else(|| missing("metadata document"))?;

        let report = ctx.engine.validate(&PackageView::new(document, plan));
        let errors = report.errors().len();
        let warnings = report.warnings().len();
        tracing::info!(
            job_id = %job.id(),
            valid = report.is_valid(),
            errors,
            warnings,
            "Package validated"
        );
        job.set_report(report);

        let config = job.config();
        let policy = &config.export;
        if errors > 0 && !policy.allow_validation_errors {
            return Err(PhotopackError::Validation(format!(
                "Package has {errors} validation error(s) and {warnings} warning(s)"
            )));
        }
        if warnings > 0 && !policy.allow_warnings {
            return Err(PhotopackError::Validation(format!(
                "Package has {warnings} validation warning(s) and warnings are not accepted"
            )));
        }
        Ok(())
    }

    async fn create_archive(&self, job: &mut ExportJob, ctx: &mut JobContext) -> Result<()> {
        let form = job.config().package.output_form;
        let location = archive::finalize(
            form,
            &ctx.staging,
            &ctx.output_dir,
            &ctx.layout,
            job.project_id(),
            job.id(),
        )
        .await?;

        tracing::info!(
            job_id = %job.id(),
            form = %form,
            location = %location.display(),
            "Deliverable created"
        );
        job.set_archive_location(location);
        Ok(())
    }

    async fn publish(&self, job: &ExportJob, status_tx: &watch::Sender<JobStatus>) {
        let status = job.status();
        self.state_manager.checkpoint(&status).await;
        status_tx.send_replace(status);
    }
}

fn missing(what: &str) -> PhotopackError {
    PhotopackError::Export(format!("Internal error: {what} not available"))
}
