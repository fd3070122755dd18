//! Subscriber setup for the `tracing` macros
//!
//! Console output is always human-readable. When `logging.local_enabled` is
//! set, the same events are also written as JSON lines to a rolling file.

use crate::config::LoggingConfig;
use crate::domain::{PhotopackError, Result};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "photopack.log";

/// Keeps the background file writer alive
///
/// Dropping it flushes buffered lines, so hold it until the process exits.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `log_level_str` applies to the `photopack` target unless `RUST_LOG` is
/// set, in which case `RUST_LOG` wins.
///
/// # Errors
///
/// Fails on an unknown level, an uncreatable log directory, or when a
/// global subscriber is already installed.
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level_str)?;
    let filter = crate_filter(level);

    let mut layers = vec![fmt::layer()
        .with_target(true)
        .with_filter(filter.clone())
        .boxed()];

    let file_guard = match json_file_writer(config)? {
        Some((writer, guard)) => {
            layers.push(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(writer)
                    .with_filter(filter)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| PhotopackError::Configuration(format!("Failed to install logger: {e}")))?;

    tracing::info!(
        level = %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn crate_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("photopack={level}")))
}

/// Non-blocking writer over the rolling log file, if file logging is on
fn json_file_writer(config: &LoggingConfig) -> Result<Option<(NonBlocking, WorkerGuard)>> {
    if !config.local_enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        PhotopackError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(
        rotation_for(&config.local_rotation),
        &config.local_path,
        LOG_FILE_PREFIX,
    );
    Ok(Some(tracing_appender::non_blocking(appender)))
}

fn rotation_for(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(level_str: &str) -> Result<Level> {
    let level = match level_str.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            return Err(PhotopackError::Configuration(format!(
                "Invalid log level '{level_str}' (expected trace, debug, info, warn or error)"
            )))
        }
    };
    Ok(level)
}
