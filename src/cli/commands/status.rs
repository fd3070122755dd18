//! Status command implementation
//!
//! This module implements the `status` command for displaying persisted
//! export job snapshots.

use crate::config::load_config;
use crate::core::export::ExportState;
use crate::core::state::{FileStatusStorage, JobStatus, StateManager};
use crate::domain::JobId;
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single job in detail
    pub job_id: Option<String>,

    /// Filter the job list by project ID
    #[arg(long)]
    pub project: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let state_manager = StateManager::new_with_storage(Arc::new(FileStatusStorage::new(
            &config.state.status_dir,
        )));

        if let Some(job_id) = &self.job_id {
            let job_id = match JobId::from_str(job_id) {
                Ok(id) => id,
                Err(e) => {
                    println!("❌ {e}");
                    return Ok(2);
                }
            };

            return match state_manager.load_status(&job_id).await {
                Ok(Some(status)) => {
                    println!("{}", status.format_summary());
                    Ok(0)
                }
                Ok(None) => {
                    println!("No status recorded for job {job_id}");
                    Ok(1)
                }
                Err(e) => {
                    println!("❌ Failed to load job status");
                    println!("   Error: {e}");
                    Ok(5)
                }
            };
        }

        println!("📊 Export Status");
        println!();

        let statuses = match state_manager.list_statuses().await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to load job statuses");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        let filtered: Vec<&JobStatus> = statuses
            .iter()
            .filter(|s| {
                self.project
                    .as_deref()
                    .map_or(true, |p| s.project_id.as_str() == p)
            })
            .collect();

        if filtered.is_empty() {
            println!("No export history found.");
            println!("Run 'photopack export --project <id>' to build a package.");
            return Ok(0);
        }

        println!("Found {} job(s):", filtered.len());
        println!();
        println!("{}", format_table(&filtered));
        Ok(0)
    }
}

fn format_table(statuses: &[&JobStatus]) -> String {
    let mut table = format!(
        "{:<38} {:<20} {:<20} {:<12} {:<20}\n",
        "Job ID", "Project", "State", "Files", "Created"
    );
    table.push_str(&"-".repeat(112));
    table.push('\n');

    for status in statuses {
        let state = match status.state {
            ExportState::Completed => "✅ completed".to_string(),
            ExportState::Failed => "❌ failed".to_string(),
            other => format!("🔄 {other}"),
        };
        table.push_str(&format!(
            "{:<38} {:<20} {:<20} {:<12} {:<20}\n",
            status.job_id.to_string(),
            status.project_id.as_str(),
            state,
            format!("{}/{}", status.processed_files, status.total_files),
            status.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Principal, ProjectId};
    use chrono::Utc;

    #[test]
    fn test_format_table() {
        let status = JobStatus {
            job_id: JobId::new(),
            project_id: ProjectId::new("bridge-7").unwrap(),
            principal: Principal::new("alice").unwrap(),
            state: ExportState::Completed,
            percent_complete: 100,
            processed_files: 5,
            total_files: 5,
            current_file: None,
            failure: None,
            validation_report: None,
            archive_location: None,
            copied_files: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: Some(Utc::now()),
        };

        let table = format_table(&[&status]);
        assert!(table.contains("bridge-7"));
        assert!(table.contains("completed"));
        assert!(table.contains("5/5"));
    }

    #[test]
    fn test_status_args_with_filters() {
        let args = StatusArgs {
            job_id: None,
            project: Some("bridge-7".to_string()),
        };
        assert_eq!(args.project.as_deref(), Some("bridge-7"));
    }
}
