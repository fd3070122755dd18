//! Configuration schema types
//!
//! This module defines the configuration structure for photopack. Each
//! section validates itself; [`PhotopackConfig::validate`] reports the first
//! violation found.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deliverable form of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputForm {
    /// Expanded folder tree
    #[default]
    Folder,
    /// Single ZIP archive
    Archive,
}

impl fmt::Display for OutputForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputForm::Folder => write!(f, "folder"),
            OutputForm::Archive => write!(f, "archive"),
        }
    }
}

impl FromStr for OutputForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "folder" => Ok(OutputForm::Folder),
            "archive" | "zip" => Ok(OutputForm::Archive),
            other => Err(format!(
                "Invalid output form '{other}'. Must be one of: folder, archive"
            )),
        }
    }
}

/// Main photopack configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotopackConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Package layout and identity
    #[serde(default)]
    pub package: PackageConfig,

    /// Export pipeline settings
    pub export: ExportConfig,

    /// Binary storage settings
    pub storage: StorageConfig,

    /// Project catalog settings
    pub catalog: CatalogConfig,

    /// Recognized classification codes
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Export authorization
    #[serde(default)]
    pub authorization: AuthorizationConfig,

    /// Job status persistence
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PhotopackConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.package.validate()?;
        self.export.validate()?;
        self.storage.validate()?;
        self.catalog.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Package layout and generator identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Single archive or expanded folder
    #[serde(default)]
    pub output_form: OutputForm,

    /// Standard version tag written to the metadata document
    #[serde(default = "default_standard_version")]
    pub standard_version: String,

    /// Generating software name
    #[serde(default = "default_software_name")]
    pub software_name: String,

    /// Generating software version
    #[serde(default = "default_software_version")]
    pub software_version: String,

    /// Root folder of the package
    #[serde(default = "default_root_folder")]
    pub root_folder: String,

    /// Metadata document file name
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Photo-files subfolder
    #[serde(default = "default_photo_folder")]
    pub photo_folder: String,

    /// Drawing-files subfolder
    #[serde(default = "default_drawing_folder")]
    pub drawing_folder: String,

    /// Extension used for photos whose binary has none
    #[serde(default = "default_photo_extension")]
    pub default_photo_extension: String,
}

impl PackageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.standard_version.trim().is_empty() {
            return Err("package.standard_version cannot be empty".to_string());
        }

        for (field, value) in [
            ("root_folder", &self.root_folder),
            ("metadata_file", &self.metadata_file),
            ("photo_folder", &self.photo_folder),
            ("drawing_folder", &self.drawing_folder),
        ] {
            if value.trim().is_empty() {
                return Err(format!("package.{field} cannot be empty"));
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(format!(
                    "package.{field} must be a single path component, got '{value}'"
                ));
            }
        }

        if self.photo_folder.eq_ignore_ascii_case(&self.drawing_folder) {
            return Err("package.photo_folder and package.drawing_folder must differ".to_string());
        }

        let ext = crate::core::naming::normalize_extension(&self.default_photo_extension);
        if !crate::core::naming::PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            return Err(format!(
                "Invalid package.default_photo_extension '{}'. Must be one of: {}",
                self.default_photo_extension,
                crate::core::naming::PHOTO_EXTENSIONS.join(", ")
            ));
        }

        Ok(())
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            output_form: OutputForm::default(),
            standard_version: default_standard_version(),
            software_name: default_software_name(),
            software_version: default_software_version(),
            root_folder: default_root_folder(),
            metadata_file: default_metadata_file(),
            photo_folder: default_photo_folder(),
            drawing_folder: default_drawing_folder(),
            default_photo_extension: default_photo_extension(),
        }
    }
}

/// Export pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving staging trees and deliverables
    pub output_dir: String,

    /// Extra attempts per file on transient storage failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Retry backoff intervals in milliseconds (last value repeats)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: Vec<u64>,

    /// Concurrent binary transfers during the copy step
    #[serde(default = "default_copy_concurrency")]
    pub copy_concurrency: usize,

    /// Continue to archive creation when the report holds only warnings
    #[serde(default = "default_true")]
    pub allow_warnings: bool,

    /// Continue to archive creation even when the report holds errors
    #[serde(default)]
    pub allow_validation_errors: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.max_retries > 10 {
            return Err(format!(
                "export.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }

        if self.copy_concurrency == 0 || self.copy_concurrency > 32 {
            return Err(format!(
                "export.copy_concurrency must be between 1 and 32, got {}",
                self.copy_concurrency
            ));
        }

        if self.allow_validation_errors && !self.allow_warnings {
            return Err(
                "export.allow_validation_errors requires export.allow_warnings = true".to_string(),
            );
        }

        Ok(())
    }

    /// Backoff before retry `attempt` (0-based), repeating the last interval
    pub fn backoff_for(&self, attempt: usize) -> std::time::Duration {
        let ms = self
            .retry_backoff_ms
            .get(attempt)
            .or_else(|| self.retry_backoff_ms.last())
            .copied()
            .unwrap_or(0);
        std::time::Duration::from_millis(ms)
    }
}

/// Binary storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory binary references resolve against
    pub root: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.trim().is_empty() {
            return Err("storage.root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Project catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding `<project_id>.json` manifests
    pub manifest_dir: String,
}

impl CatalogConfig {
    fn validate(&self) -> Result<(), String> {
        if self.manifest_dir.trim().is_empty() {
            return Err("catalog.manifest_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Recognized classification code sets
///
/// An empty list leaves that level unrestricted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Recognized major categories
    #[serde(default)]
    pub recognized_major_categories: Vec<String>,

    /// Recognized photo categories, in delivery order
    #[serde(default = "default_recognized_categories")]
    pub recognized_categories: Vec<String>,

    /// Recognized work types
    #[serde(default)]
    pub recognized_work_types: Vec<String>,

    /// Recognized detail types
    #[serde(default)]
    pub recognized_detail_types: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            recognized_major_categories: Vec::new(),
            recognized_categories: default_recognized_categories(),
            recognized_work_types: Vec::new(),
            recognized_detail_types: Vec::new(),
        }
    }
}

/// Export authorization configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthorizationConfig {
    /// Principals allowed to export (empty allows everyone)
    #[serde(default)]
    pub allowed_principals: Vec<String>,
}

/// Job status persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory holding `<job_id>.json` status snapshots
    #[serde(default = "default_status_dir")]
    pub status_dir: String,
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.status_dir.trim().is_empty() {
            return Err("state.status_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            status_dir: default_status_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file path
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Maximum log file size in MB
    #[serde(default = "default_local_max_size_mb")]
    pub local_max_size_mb: usize,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_max_size_mb == 0 {
            return Err("logging.local_max_size_mb must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_max_size_mb: default_local_max_size_mb(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_standard_version() -> String {
    "05".to_string()
}

fn default_software_name() -> String {
    "photopack".to_string()
}

fn default_software_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_root_folder() -> String {
    "PHOTO".to_string()
}

fn default_metadata_file() -> String {
    "PHOTO05.XML".to_string()
}

fn default_photo_folder() -> String {
    "PIC".to_string()
}

fn default_drawing_folder() -> String {
    "DRA".to_string()
}

fn default_photo_extension() -> String {
    "JPG".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_backoff_ms() -> Vec<u64> {
    vec![200, 500, 1000]
}

fn default_copy_concurrency() -> usize {
    4
}

fn default_recognized_categories() -> Vec<String> {
    [
        "着手前及び完成写真",
        "施工状況写真",
        "安全管理写真",
        "使用材料写真",
        "品質管理写真",
        "出来形管理写真",
        "災害写真",
        "事故写真",
        "その他",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_status_dir() -> String {
    ".photopack/jobs".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_max_size_mb() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_config() -> ExportConfig {
        ExportConfig {
            output_dir: "/tmp/out".to_string(),
            max_retries: 3,
            retry_backoff_ms: vec![100, 200],
            copy_concurrency: 4,
            allow_warnings: true,
            allow_validation_errors: false,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_form_parse() {
        assert_eq!("folder".parse::<OutputForm>().unwrap(), OutputForm::Folder);
        assert_eq!("ARCHIVE".parse::<OutputForm>().unwrap(), OutputForm::Archive);
        assert!("tarball".parse::<OutputForm>().is_err());
        assert_eq!(OutputForm::Archive.to_string(), "archive");
    }

    #[test]
    fn test_package_defaults() {
        let config = PackageConfig::default();
        assert_eq!(config.root_folder, "PHOTO");
        assert_eq!(config.metadata_file, "PHOTO05.XML");
        assert_eq!(config.photo_folder, "PIC");
        assert_eq!(config.drawing_folder, "DRA");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_package_rejects_nested_folder() {
        let config = PackageConfig {
            photo_folder: "PIC/sub".to_string(),
            ..PackageConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("single path component"));
    }

    #[test]
    fn test_package_rejects_same_folders() {
        let config = PackageConfig {
            drawing_folder: "pic".to_string(),
            ..PackageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_package_rejects_unknown_photo_extension() {
        let config = PackageConfig {
            default_photo_extension: "png".to_string(),
            ..PackageConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PackageConfig {
            default_photo_extension: ".tiff".to_string(),
            ..PackageConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = export_config();
        assert!(config.validate().is_ok());

        config.max_retries = 11;
        assert!(config.validate().is_err());

        config.max_retries = 3;
        config.copy_concurrency = 0;
        assert!(config.validate().is_err());

        config.copy_concurrency = 33;
        assert!(config.validate().is_err());

        config.copy_concurrency = 4;
        config.allow_warnings = false;
        config.allow_validation_errors = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_repeats_last_value() {
        let config = export_config();
        assert_eq!(config.backoff_for(0).as_millis(), 100);
        assert_eq!(config.backoff_for(1).as_millis(), 200);
        assert_eq!(config.backoff_for(5).as_millis(), 200);

        let empty = ExportConfig {
            retry_backoff_ms: vec![],
            ..export_config()
        };
        assert_eq!(empty.backoff_for(0).as_millis(), 0);
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_max_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_classification_defaults() {
        let config = ClassificationConfig::default();
        assert!(config.recognized_major_categories.is_empty());
        assert!(config
            .recognized_categories
            .contains(&"施工状況写真".to_string()));
        assert!(config.recognized_work_types.is_empty());
    }
}
