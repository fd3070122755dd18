//! Verify command implementation
//!
//! This module implements the `verify` command, an offline check of an
//! expanded delivery package.

use crate::config::load_config;
use crate::core::assembly::PackageLayout;
use crate::core::state::{FileStatusStorage, StateManager};
use crate::core::verification::Verifier;
use crate::domain::JobId;
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Package root folder to check
    pub package_dir: String,

    /// Also compare file checksums against this job's copy manifest
    #[arg(long, value_name = "JOB_ID")]
    pub job: Option<String>,
}

impl VerifyArgs {
    /// Execute the verify command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(package_dir = %self.package_dir, "Verifying package");

        let config = match load_config(config_path) {
            Ok(c) => Some(c),
            Err(e) if self.job.is_some() => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::debug!(error = %e, "No usable configuration, using the default layout");
                None
            }
        };

        let layout = config
            .as_ref()
            .map(|c| PackageLayout::from_config(&c.package))
            .unwrap_or_default();

        let manifest = match (&self.job, &config) {
            (Some(job), Some(config)) => {
                let job_id = match JobId::from_str(job) {
                    Ok(id) => id,
                    Err(e) => {
                        println!("❌ {e}");
                        return Ok(2);
                    }
                };
                let state_manager = StateManager::new_with_storage(Arc::new(
                    FileStatusStorage::new(&config.state.status_dir),
                ));
                match state_manager.load_status(&job_id).await? {
                    Some(status) => Some(status.copied_files),
                    None => {
                        println!("❌ No status recorded for job {job_id}");
                        return Ok(5);
                    }
                }
            }
            _ => None,
        };

        let report = match Verifier::new(layout).verify_package(&self.package_dir, manifest.as_deref())
        {
            Ok(report) => report,
            Err(e) => {
                println!("❌ {e}");
                return Ok(5);
            }
        };

        println!("{}", report.format_summary());
        if report.is_success() {
            println!("✅ Package is well-formed");
            Ok(0)
        } else {
            println!("❌ Package has {} problem(s)", report.failures.len());
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_verify_without_config_uses_default_layout() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("PHOTO");
        std::fs::create_dir_all(root.join("PIC")).unwrap();
        std::fs::write(root.join("PHOTO05.XML"), b"<photodata/>").unwrap();
        std::fs::write(root.join("PIC").join("P0000001.JPG"), b"jpeg").unwrap();

        let args = VerifyArgs {
            package_dir: root.to_string_lossy().into_owned(),
            job: None,
        };
        let config_path = dir.path().join("absent.toml");
        let code = args.execute(config_path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_verify_reports_gap() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("PHOTO");
        std::fs::create_dir_all(root.join("PIC")).unwrap();
        std::fs::write(root.join("PHOTO05.XML"), b"<photodata/>").unwrap();
        std::fs::write(root.join("PIC").join("P0000002.JPG"), b"jpeg").unwrap();

        let args = VerifyArgs {
            package_dir: root.to_string_lossy().into_owned(),
            job: None,
        };
        let config_path = dir.path().join("absent.toml");
        let code = args.execute(config_path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, 1);
    }
}
