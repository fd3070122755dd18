//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted file logs
//! - Configurable log levels (`RUST_LOG` wins over configuration)
//! - Local file logging with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use photopack::logging::init_logging;
//! use photopack::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an export job step transition
///
/// # Example
///
/// ```no_run
/// use photopack::log_step_transition;
/// use photopack::domain::JobId;
///
/// let job_id = JobId::new();
/// log_step_transition!(job_id, "preparing", "creating-folders");
/// ```
#[macro_export]
macro_rules! log_step_transition {
    ($job_id:expr, $from:expr, $to:expr) => {
        tracing::info!(
            job_id = %$job_id,
            from = %$from,
            step = %$to,
            "Export step started"
        );
    };
}

/// Log copy progress for one file
///
/// # Example
///
/// ```no_run
/// use photopack::log_copy_progress;
/// use photopack::domain::JobId;
///
/// let job_id = JobId::new();
/// log_copy_progress!(job_id, "P0000001.JPG", 1, 40);
/// ```
#[macro_export]
macro_rules! log_copy_progress {
    ($job_id:expr, $file:expr, $processed:expr, $total:expr) => {
        tracing::debug!(
            job_id = %$job_id,
            file = %$file,
            processed = $processed,
            total = $total,
            progress_pct = ($processed as f64 / ($total as f64).max(1.0) * 100.0),
            "Copied file"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use photopack::log_error_with_context;
/// use photopack::domain::PhotopackError;
///
/// let error = PhotopackError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use photopack::log_retry_attempt;
///
/// log_retry_attempt!("P0000003.JPG", 2, 3, "resource busy");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($file:expr, $attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            file = %$file,
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying copy"
        );
    };
}
