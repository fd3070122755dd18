//! Integration tests for logging functionality
//!
//! The global subscriber can be installed once per process, so everything
//! that needs it lives in a single test.

use photopack::config::LoggingConfig;
use photopack::domain::{JobId, PhotopackError};
use photopack::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_max_size_mb, 100);
}

#[test]
fn test_file_logging_writes_json() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
        local_max_size_mb: 100,
    };

    // The macros expand in this crate, so widen the filter past `photopack=`
    std::env::set_var("RUST_LOG", "debug");
    let guard = init_logging("debug", &config).unwrap();
    std::env::remove_var("RUST_LOG");
    assert!(log_path.is_dir());

    let job_id = JobId::new();
    photopack::log_step_transition!(job_id, "preparing", "creating-folders");
    photopack::log_copy_progress!(job_id, "P0000001.JPG", 1, 4);
    photopack::log_retry_attempt!("P0000002.JPG", 1, 3, "resource busy");
    let error = PhotopackError::Export("disk full".to_string());
    photopack::log_error_with_context!(&error, format!("job {job_id}"));

    // Flushes the non-blocking writer
    drop(guard);

    let contents: String = std::fs::read_dir(&log_path)
        .unwrap()
        .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect();
    assert!(contents.contains("Export step started"), "{contents}");
    assert!(contents.contains("P0000001.JPG"));
    assert!(contents.contains(&job_id.to_string()));

    // A second subscriber cannot be installed
    assert!(init_logging("info", &LoggingConfig::default()).is_err());
}
