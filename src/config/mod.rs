//! Configuration management for photopack.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! photopack uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PHOTOPACK_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use photopack::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("photopack.toml")?;
//!
//! println!("Output form: {}", config.package.output_form);
//! println!("Output dir: {}", config.export.output_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`PackageConfig`] - Output form, folder names, standard version, generator identity
//! - [`ExportConfig`] - Output directory, retries, copy concurrency, validation policy
//! - [`StorageConfig`] - Binary storage root
//! - [`CatalogConfig`] - Project manifest directory
//! - [`ClassificationConfig`] - Recognized classification codes
//! - [`AuthorizationConfig`] - Principals allowed to export
//! - [`StateConfig`] - Job status directory
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [package]
//! output_form = "archive"
//! standard_version = "05"
//!
//! [export]
//! output_dir = "/srv/photopack/out"
//! max_retries = 3
//! retry_backoff_ms = [200, 500, 1000]
//!
//! [storage]
//! root = "${PHOTOPACK_BINARY_ROOT}"
//!
//! [catalog]
//! manifest_dir = "/srv/photopack/manifests"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, AuthorizationConfig, CatalogConfig, ClassificationConfig, ExportConfig,
    LoggingConfig, OutputForm, PackageConfig, PhotopackConfig, StateConfig, StorageConfig,
};
