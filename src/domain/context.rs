//! Error context extension trait
//!
//! Adds `.context()` and `.with_context()` to any `Result` whose error
//! converts into [`PhotopackError`], keeping the typed error in library code.
//!
//! # Examples
//!
//! ```rust
//! use photopack::domain::Result;
//! use photopack::domain::context::ResultExt;
//!
//! fn read_manifest(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read manifest: {path}"))
//! }
//! ```

use crate::domain::errors::PhotopackError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
///
/// The variant of the underlying error is kept; only its message gains the
/// context prefix. Variants with a structured payload (`Naming`, `Storage`)
/// become [`PhotopackError::Other`].
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context computed only when an error occurs
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PhotopackError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

fn wrap(error: PhotopackError, context: impl std::fmt::Display) -> PhotopackError {
    use PhotopackError::*;
    match error {
        Configuration(m) => Configuration(format!("{context}: {m}")),
        Assembly(m) => Assembly(format!("{context}: {m}")),
        Metadata(m) => Metadata(format!("{context}: {m}")),
        Validation(m) => Validation(format!("{context}: {m}")),
        Catalog(m) => Catalog(format!("{context}: {m}")),
        Authorization(m) => Authorization(format!("{context}: {m}")),
        Export(m) => Export(format!("{context}: {m}")),
        State(m) => State(format!("{context}: {m}")),
        Serialization(m) => Serialization(format!("{context}: {m}")),
        Io(m) => Io(format!("{context}: {m}")),
        Cancelled(m) => Cancelled(format!("{context}: {m}")),
        other => Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StorageError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_context_keeps_variant() {
        let result: Result<()> = Err(PhotopackError::Export("disk full".to_string()));
        let err = result.context("Writing archive").unwrap_err();

        assert!(matches!(err, PhotopackError::Export(_)));
        assert_eq!(err.to_string(), "Export error: Writing archive: disk full");
    }

    #[test]
    fn test_context_on_io_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("Creating staging folder").unwrap_err();
        assert!(matches!(err, PhotopackError::Io(ref m) if m.starts_with("Creating staging folder")));
    }

    #[test]
    fn test_context_on_storage_error() {
        let result: std::result::Result<(), StorageError> =
            Err(StorageError::NotFound("a.jpg".to_string()));
        let err = result.context("Copying P0000001.JPG").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Copying P0000001.JPG"));
        assert!(msg.contains("a.jpg"));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        let result: Result<i32> = Ok(42);
        let value = result
            .with_context(|| {
                flag.store(true, Ordering::SeqCst);
                "never"
            })
            .unwrap();

        assert_eq!(value, 42);
        assert!(!called.load(Ordering::SeqCst));
    }
}
