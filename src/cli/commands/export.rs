//! Export command implementation
//!
//! This module implements the `export` command, which builds the delivery
//! package for one project.

use crate::config::{load_config, OutputForm};
use crate::core::export::{ExportService, ExportState};
use crate::core::state::JobStatus;
use crate::domain::{PhotopackError, Principal, ProjectId};
use clap::Args;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Project to export
    #[arg(short, long)]
    pub project: String,

    /// Principal the export is requested as
    #[arg(long, env = "PHOTOPACK_PRINCIPAL", default_value = "cli")]
    pub principal: String,

    /// Override the output form (folder or archive)
    #[arg(long, value_name = "FORM")]
    pub output_form: Option<String>,

    /// Cancel the export if it runs longer than this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(project_id = %self.project, "Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration loading failed");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        if let Some(form) = &self.output_form {
            match OutputForm::from_str(form) {
                Ok(form) => {
                    tracing::info!(output_form = %form, "Overriding output form from CLI");
                    config.package.output_form = form;
                }
                Err(e) => {
                    eprintln!("{e}");
                    return Ok(2);
                }
            }
        }

        let (principal, project_id) = match (
            Principal::new(self.principal.as_str()),
            ProjectId::new(self.project.as_str()),
        ) {
            (Ok(principal), Ok(project_id)) => (principal, project_id),
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("Invalid argument: {e}");
                return Ok(2);
            }
        };

        if !self.yes {
            println!("Export Configuration:");
            println!("  Project: {project_id}");
            println!("  Requested by: {principal}");
            println!("  Output form: {}", config.package.output_form);
            println!("  Output dir: {}", config.export.output_dir);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let forwarder = tokio::spawn(forward_cancellation(
            shutdown_signal,
            self.timeout_secs.map(Duration::from_secs),
            cancel_tx,
        ));

        println!("🚀 Starting export...");
        println!();

        let service = ExportService::from_config(config);
        let result = service.request_export(principal, project_id, cancel_rx).await;
        forwarder.abort();

        let status = match result {
            Ok(status) => status,
            Err(e @ PhotopackError::Authorization(_)) => {
                tracing::warn!(error = %e, "Export request denied");
                eprintln!("{e}");
                return Ok(3);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export request failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        println!("{}", status.format_summary());
        if let Some(report) = &status.validation_report {
            if !report.errors().is_empty() || !report.warnings().is_empty() {
                println!("{}", report.format_summary());
            }
        }

        let exit_code = exit_code_for(&status);
        match exit_code {
            0 => println!("✅ Export completed successfully!"),
            130 => println!("⚠️  Export cancelled. No deliverable was written."),
            _ => println!("❌ Export failed. No deliverable was written."),
        }
        Ok(exit_code)
    }
}

/// Forwards a shutdown signal or an expired timeout to the job's cancel channel
async fn forward_cancellation(
    mut shutdown: watch::Receiver<bool>,
    timeout: Option<Duration>,
    cancel: watch::Sender<bool>,
) {
    let deadline = async {
        match timeout {
            Some(timeout) => tokio::time::sleep(timeout).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = wait_for_shutdown(&mut shutdown) => {
            tracing::info!("Cancelling export on shutdown signal");
        }
        _ = deadline => {
            tracing::warn!(timeout_secs = ?timeout.map(|t| t.as_secs()), "Export timed out, cancelling");
        }
    }
    let _ = cancel.send(true);
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Maps a finished job onto the CLI exit code
fn exit_code_for(status: &JobStatus) -> i32 {
    let Some(failure) = &status.failure else {
        return if status.is_completed() { 0 } else { 5 };
    };

    if failure.reason.starts_with("Cancelled") {
        130
    } else if failure.step == ExportState::Validating {
        1
    } else if failure.step == ExportState::Preparing && failure.reason.starts_with("Configuration")
    {
        2
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::FailureDetail;
    use crate::domain::JobId;
    use chrono::Utc;

    fn status(state: ExportState, failure: Option<(ExportState, &str)>) -> JobStatus {
        JobStatus {
            job_id: JobId::new(),
            project_id: ProjectId::new("p1").unwrap(),
            principal: Principal::new("alice").unwrap(),
            state,
            percent_complete: 0,
            processed_files: 0,
            total_files: 0,
            current_file: None,
            failure: failure.map(|(step, reason)| FailureDetail {
                step,
                reason: reason.to_string(),
                processed_files: 0,
                total_files: 0,
            }),
            validation_report: None,
            archive_location: None,
            copied_files: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&status(ExportState::Completed, None)), 0);
        assert_eq!(
            exit_code_for(&status(
                ExportState::Failed,
                Some((ExportState::Validating, "Validation error: 2 error(s)"))
            )),
            1
        );
        assert_eq!(
            exit_code_for(&status(
                ExportState::Failed,
                Some((ExportState::Preparing, "Configuration error: bad"))
            )),
            2
        );
        assert_eq!(
            exit_code_for(&status(
                ExportState::Failed,
                Some((ExportState::CopyingPhotos, "Cancelled: Export cancelled during copy"))
            )),
            130
        );
        assert_eq!(
            exit_code_for(&status(
                ExportState::Failed,
                Some((ExportState::CopyingPhotos, "Export error: Failed to copy"))
            )),
            5
        );
    }

    #[tokio::test]
    async fn test_timeout_triggers_cancel() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        forward_cancellation(shutdown_rx, Some(Duration::from_millis(10)), cancel_tx).await;

        assert!(*cancel_rx.borrow_and_update());
    }

    #[tokio::test]
    async fn test_shutdown_triggers_cancel() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let handle = tokio::spawn(forward_cancellation(shutdown_rx, None, cancel_tx));
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(*cancel_rx.borrow());
    }
}
