//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the photopack configuration file.

use crate::config::{load_config, PhotopackConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as well; a failure here covers both cases
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print!("{}", Self::format_summary(&config));
        println!();
        Ok(0)
    }

    fn format_summary(config: &PhotopackConfig) -> String {
        let classification = &config.classification;
        let restricted = |codes: &[String]| {
            if codes.is_empty() {
                "unrestricted".to_string()
            } else {
                format!("{} code(s)", codes.len())
            }
        };

        let mut summary = String::from("Configuration Summary:\n");
        summary.push_str(&format!("  Log Level: {}\n", config.application.log_level));
        summary.push_str(&format!("  Output Form: {}\n", config.package.output_form));
        summary.push_str(&format!(
            "  Standard Version: {}\n",
            config.package.standard_version
        ));
        summary.push_str(&format!(
            "  Layout: {}/{{{}, {}, {}}}\n",
            config.package.root_folder,
            config.package.metadata_file,
            config.package.photo_folder,
            config.package.drawing_folder
        ));
        summary.push_str(&format!("  Output Dir: {}\n", config.export.output_dir));
        summary.push_str(&format!("  Storage Root: {}\n", config.storage.root));
        summary.push_str(&format!("  Manifest Dir: {}\n", config.catalog.manifest_dir));
        summary.push_str(&format!("  Status Dir: {}\n", config.state.status_dir));
        summary.push_str(&format!(
            "  Retries: {} (backoff {:?} ms)\n",
            config.export.max_retries, config.export.retry_backoff_ms
        ));
        summary.push_str(&format!(
            "  Copy Concurrency: {}\n",
            config.export.copy_concurrency
        ));
        summary.push_str(&format!(
            "  Allow Warnings: {}, Allow Errors: {}\n",
            config.export.allow_warnings, config.export.allow_validation_errors
        ));
        summary.push_str(&format!(
            "  Categories: {}\n",
            restricted(&classification.recognized_categories)
        ));
        summary.push_str(&format!(
            "  Authorized Principals: {}\n",
            if config.authorization.allowed_principals.is_empty() {
                "everyone".to_string()
            } else {
                config.authorization.allowed_principals.join(", ")
            }
        ));
        summary
    }
}
