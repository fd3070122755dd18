//! Domain error types
//!
//! This module defines the error hierarchy for photopack. Component errors
//! (naming, storage) are specific enums that convert into [`PhotopackError`]
//! with `?`; the export coordinator is the only place that turns any of them
//! into a job-level failure.

use thiserror::Error;

/// Main photopack error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum PhotopackError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Delivery name generation errors
    #[error("Naming error: {0}")]
    Naming(#[from] NamingError),

    /// Folder plan assembly errors
    #[error("Assembly error: {0}")]
    Assembly(String),

    /// Metadata document errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Validation errors (blocking findings, or malformed validation input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Binary storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Project catalog errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Authorization errors
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Export pipeline errors
    #[error("Export error: {0}")]
    Export(String),

    /// Job status persistence errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The job was cancelled before reaching a terminal state
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PhotopackError {
    /// Whether retrying the failed operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PhotopackError::Storage(e) if e.is_transient())
    }
}

/// Delivery name generation errors
///
/// Raised by the stateless naming functions and by the per-job sequence
/// generator. Messages are part of the observable contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// Sequence below the first valid number
    #[error("sequence must be ≥ 1, got {0}")]
    BelowMinimum(i64),

    /// Sequence above the last valid number
    #[error("sequence must be ≤ 9999999, got {0}")]
    AboveMaximum(i64),

    /// Sequence given as a non-integral number
    #[error("sequence must be an integer, got {0}")]
    NotAnInteger(String),

    /// Drawing extension outside the drawing-supported set
    #[error("unsupported drawing extension '{0}', expected one of JPG, TIF, PDF")]
    UnsupportedDrawingExtension(String),
}

/// Binary storage errors
///
/// These errors don't expose the underlying I/O types; the transient/permanent
/// split drives retry decisions during the copy step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The referenced binary does not exist
    #[error("Binary not found: {0}")]
    NotFound(String),

    /// The binary reference is malformed or escapes the storage root
    #[error("Invalid binary reference: {0}")]
    InvalidReference(String),

    /// A failure that may succeed on retry
    #[error("Transient storage failure: {0}")]
    Transient(String),

    /// A failure that will not succeed on retry
    #[error("Storage failure: {0}")]
    Permanent(String),
}

impl StorageError {
    /// Whether the failure may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Transient(_))
    }

    /// Classify an I/O error by kind
    pub fn from_io(context: impl AsRef<str>, err: &std::io::Error) -> Self {
        use std::io::ErrorKind;

        let message = format!("{}: {}", context.as_ref(), err);
        match err.kind() {
            ErrorKind::NotFound => StorageError::NotFound(message),
            ErrorKind::Interrupted
            | ErrorKind::TimedOut
            | ErrorKind::WouldBlock
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::UnexpectedEof => StorageError::Transient(message),
            _ => StorageError::Permanent(message),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PhotopackError {
    fn from(err: std::io::Error) -> Self {
        PhotopackError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PhotopackError {
    fn from(err: serde_json::Error) -> Self {
        PhotopackError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PhotopackError {
    fn from(err: toml::de::Error) -> Self {
        PhotopackError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from quick-xml writer errors
impl From<quick_xml::Error> for PhotopackError {
    fn from(err: quick_xml::Error) -> Self {
        PhotopackError::Metadata(format!("XML error: {err}"))
    }
}

// Conversion from zip archive errors
impl From<zip::result::ZipError> for PhotopackError {
    fn from(err: zip::result::ZipError) -> Self {
        PhotopackError::Export(format!("Archive error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photopack_error_display() {
        let err = PhotopackError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_naming_error_messages() {
        assert_eq!(
            NamingError::BelowMinimum(0).to_string(),
            "sequence must be ≥ 1, got 0"
        );
        assert_eq!(
            NamingError::AboveMaximum(10_000_000).to_string(),
            "sequence must be ≤ 9999999, got 10000000"
        );
        assert!(NamingError::NotAnInteger("1.5".to_string())
            .to_string()
            .contains("must be an integer"));
    }

    #[test]
    fn test_naming_error_conversion() {
        let err: PhotopackError = NamingError::BelowMinimum(-1).into();
        assert!(matches!(err, PhotopackError::Naming(_)));
    }

    #[test]
    fn test_storage_error_transient_classification() {
        let transient: PhotopackError = StorageError::Transient("busy".to_string()).into();
        assert!(transient.is_transient());

        let permanent: PhotopackError = StorageError::NotFound("a.jpg".to_string()).into();
        assert!(!permanent.is_transient());

        assert!(!PhotopackError::Io("disk full".to_string()).is_transient());
    }

    #[test]
    fn test_storage_error_from_io_kind() {
        let timed_out = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert!(StorageError::from_io("read", &timed_out).is_transient());

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            StorageError::from_io("read", &missing),
            StorageError::NotFound(_)
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            StorageError::from_io("read", &denied),
            StorageError::Permanent(_)
        ));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: PhotopackError = io_err.into();
        assert!(matches!(err, PhotopackError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: PhotopackError = json_err.into();
        assert!(matches!(err, PhotopackError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: PhotopackError = toml_err.into();
        assert!(matches!(err, PhotopackError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
