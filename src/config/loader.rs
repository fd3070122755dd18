//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PhotopackConfig;
use crate::domain::errors::PhotopackError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PhotopackConfig
/// 4. Applies environment variable overrides (PHOTOPACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`PhotopackError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use photopack::config::loader::load_config;
///
/// let config = load_config("photopack.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PhotopackConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PhotopackError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PhotopackError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying substitution, overrides and validation
pub fn parse_config(contents: &str) -> Result<PhotopackConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PhotopackConfig = toml::from_str(&contents)
        .map_err(|e| PhotopackError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PhotopackError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched. Every missing variable is
/// reported in a single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(PhotopackError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        PhotopackError::Configuration(format!("Invalid value '{value}' for {name}"))
    })
}

/// Applies environment variable overrides using PHOTOPACK_* prefix
///
/// Environment variables follow the pattern: PHOTOPACK_<SECTION>_<KEY>
/// For example: PHOTOPACK_EXPORT_OUTPUT_DIR, PHOTOPACK_PACKAGE_OUTPUT_FORM
fn apply_env_overrides(config: &mut PhotopackConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PHOTOPACK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Package overrides
    if let Ok(val) = std::env::var("PHOTOPACK_PACKAGE_OUTPUT_FORM") {
        config.package.output_form = val
            .parse()
            .map_err(PhotopackError::Configuration)?;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_PACKAGE_STANDARD_VERSION") {
        config.package.standard_version = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("PHOTOPACK_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_EXPORT_MAX_RETRIES") {
        config.export.max_retries = parse_override("PHOTOPACK_EXPORT_MAX_RETRIES", &val)?;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_EXPORT_COPY_CONCURRENCY") {
        config.export.copy_concurrency =
            parse_override("PHOTOPACK_EXPORT_COPY_CONCURRENCY", &val)?;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_EXPORT_ALLOW_WARNINGS") {
        config.export.allow_warnings = parse_override("PHOTOPACK_EXPORT_ALLOW_WARNINGS", &val)?;
    }

    // Collaborator overrides
    if let Ok(val) = std::env::var("PHOTOPACK_STORAGE_ROOT") {
        config.storage.root = val;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_CATALOG_MANIFEST_DIR") {
        config.catalog.manifest_dir = val;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_STATE_STATUS_DIR") {
        config.state.status_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PHOTOPACK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("PHOTOPACK_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("PHOTOPACK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
