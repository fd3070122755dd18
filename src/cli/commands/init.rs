//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "photopack.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing photopack configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set PHOTOPACK_BINARY_ROOT in a .env file or your environment");
                println!("  3. Put one <project_id>.json manifest per project in the manifest dir");
                println!("  4. Validate configuration: photopack validate-config");
                println!("  5. Run export: photopack export --project <project_id>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# photopack configuration
# Construction photo delivery package engine

[application]
log_level = "info"

[package]
output_form = "folder"  # folder | archive
standard_version = "05"

[export]
output_dir = "./out"
max_retries = 3
retry_backoff_ms = [200, 500, 1000]
copy_concurrency = 4
allow_warnings = true
allow_validation_errors = false

[storage]
root = "${PHOTOPACK_BINARY_ROOT}"

[catalog]
manifest_dir = "./manifests"

[authorization]
allowed_principals = []

[state]
status_dir = ".photopack/jobs"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
local_max_size_mb = 100
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# photopack configuration
# Construction photo delivery package engine
#
# This file contains all configuration options with examples and explanations.
# Any key can be overridden with PHOTOPACK_<SECTION>_<KEY>, for example
# PHOTOPACK_EXPORT_OUTPUT_DIR=/srv/out.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
log_level = "info"

# ============================================================================
# Package Layout
# ============================================================================
[package]
# Deliverable form: "folder" (expanded tree) or "archive" (single ZIP)
output_form = "folder"

# Delivery standard version, written to the metadata document
standard_version = "05"

# Generator identity recorded in the metadata document
software_name = "photopack"
# software_version defaults to the running binary's version

# Folder and file names
root_folder = "PHOTO"
metadata_file = "PHOTO05.XML"
photo_folder = "PIC"
drawing_folder = "DRA"

# Extension used when a photo's source file has none (JPG, JPEG, TIF, TIFF)
default_photo_extension = "JPG"

# ============================================================================
# Export Pipeline
# ============================================================================
[export]
# Directory receiving staging trees and deliverables
output_dir = "./out"

# Extra attempts per file on transient storage failures (0-10)
max_retries = 3

# Backoff between attempts in milliseconds; the last value repeats
retry_backoff_ms = [200, 500, 1000]

# Concurrent binary transfers during the copy step (1-32)
copy_concurrency = 4

# Continue when validation reports only warnings
allow_warnings = true

# Continue even when validation reports errors (requires allow_warnings)
allow_validation_errors = false

# ============================================================================
# Collaborators
# ============================================================================
[storage]
# Root directory binary references resolve against
root = "${PHOTOPACK_BINARY_ROOT}"

[catalog]
# Directory holding one <project_id>.json manifest per project
manifest_dir = "./manifests"

[authorization]
# Principals allowed to export; "name" allows every project,
# "name@project" allows one project. Empty allows everyone.
allowed_principals = []
# allowed_principals = ["alice", "bob@bridge-7"]

# ============================================================================
# Classification Codes
# ============================================================================
# Empty lists leave that level unrestricted. recognized_categories also fixes
# the delivery order of photo categories.
[classification]
recognized_major_categories = []
recognized_work_types = []
recognized_detail_types = []
# recognized_categories = ["着手前及び完成写真", "施工状況写真", "その他"]

# ============================================================================
# Job Status
# ============================================================================
[state]
# Directory holding <job_id>.json status snapshots
status_dir = ".photopack/jobs"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write JSON logs to local_path in addition to the console
local_enabled = false
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"

# Maximum log file size in MB
local_max_size_mb = 100
"#
        .to_string()
    }
}
