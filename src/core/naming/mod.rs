//! Delivery file naming
//!
//! The delivery grammar is `P` or `D`, a sequence number zero-padded to seven
//! digits, a dot, and a normalized extension (`P0000001.JPG`, `D0000003.PDF`).
//! This is the byte-exact compatibility surface of the package: downstream
//! inspection tooling rejects anything else.
//!
//! Stateless functions live here; the per-job counter lives in
//! [`generator::SequenceNameGenerator`].

pub mod generator;

pub use generator::SequenceNameGenerator;

use crate::domain::NamingError;
use regex::Regex;
use std::sync::LazyLock;

/// First valid sequence number
pub const MIN_SEQUENCE: u32 = 1;

/// Last valid sequence number (seven digits)
pub const MAX_SEQUENCE: u32 = 9_999_999;

/// Extension used when a photo has none
pub const DEFAULT_PHOTO_EXTENSION: &str = "JPEG";

/// Extensions accepted for photo delivery names
pub const PHOTO_EXTENSIONS: [&str; 4] = ["JPG", "JPEG", "TIF", "TIFF"];

/// Extensions accepted for drawing delivery names
pub const DRAWING_EXTENSIONS: [&str; 3] = ["JPG", "TIF", "PDF"];

// ASCII classes only; the grammar is byte-exact.
static SEQUENCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[PD]([0-9]{7})\.[A-Za-z0-9_]+$").unwrap());

static PHOTO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^P[0-9]{7}\.(JPG|JPEG|TIF|TIFF)$").unwrap());

static DRAWING_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^D[0-9]{7}\.(JPG|TIF|PDF)$").unwrap());

/// Values that can be used as a sequence number
///
/// Integers are range-checked; floating-point values must also be integral.
pub trait IntoSequence {
    /// Converts into a checked sequence number
    fn into_sequence(self) -> Result<u32, NamingError>;
}

fn check_range(value: i64) -> Result<u32, NamingError> {
    if value < i64::from(MIN_SEQUENCE) {
        return Err(NamingError::BelowMinimum(value));
    }
    if value > i64::from(MAX_SEQUENCE) {
        return Err(NamingError::AboveMaximum(value));
    }
    // In range, so the narrowing is lossless.
    Ok(value as u32)
}

impl IntoSequence for i64 {
    fn into_sequence(self) -> Result<u32, NamingError> {
        check_range(self)
    }
}

impl IntoSequence for i32 {
    fn into_sequence(self) -> Result<u32, NamingError> {
        check_range(i64::from(self))
    }
}

impl IntoSequence for u32 {
    fn into_sequence(self) -> Result<u32, NamingError> {
        check_range(i64::from(self))
    }
}

impl IntoSequence for usize {
    fn into_sequence(self) -> Result<u32, NamingError> {
        check_range(i64::try_from(self).unwrap_or(i64::MAX))
    }
}

impl IntoSequence for f64 {
    fn into_sequence(self) -> Result<u32, NamingError> {
        if !self.is_finite() || self.fract() != 0.0 {
            return Err(NamingError::NotAnInteger(self.to_string()));
        }
        if self < i64::MIN as f64 {
            return Err(NamingError::BelowMinimum(i64::MIN));
        }
        if self > i64::MAX as f64 {
            return Err(NamingError::AboveMaximum(i64::MAX));
        }
        check_range(self as i64)
    }
}

/// Normalizes a file extension for delivery names
///
/// Strips one leading dot, uppercases, and folds `JPEG` to `JPG` and `TIFF`
/// to `TIF`. Idempotent.
///
/// # Examples
///
/// ```
/// use photopack::core::naming::normalize_extension;
///
/// assert_eq!(normalize_extension("jpeg"), "JPG");
/// assert_eq!(normalize_extension(".tiff"), "TIF");
/// assert_eq!(normalize_extension("pdf"), "PDF");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    let upper = ext.strip_prefix('.').unwrap_or(ext).to_uppercase();
    match upper.as_str() {
        "JPEG" => "JPG".to_string(),
        "TIFF" => "TIF".to_string(),
        _ => upper,
    }
}

fn format_name(prefix: char, sequence: u32, extension: &str) -> String {
    format!("{prefix}{sequence:07}.{}", normalize_extension(extension))
}

/// Generates a photo delivery name with the default extension
///
/// # Errors
///
/// Returns a [`NamingError`] if `sequence` is outside `1..=9999999` or is
/// not an integer.
///
/// # Examples
///
/// ```
/// use photopack::core::naming::generate_photo_file_name;
///
/// assert_eq!(generate_photo_file_name(1).unwrap(), "P0000001.JPG");
/// assert!(generate_photo_file_name(0).is_err());
/// assert!(generate_photo_file_name(1.5).is_err());
/// ```
pub fn generate_photo_file_name(sequence: impl IntoSequence) -> Result<String, NamingError> {
    generate_photo_file_name_with_extension(sequence, DEFAULT_PHOTO_EXTENSION)
}

/// Generates a photo delivery name with an explicit extension
pub fn generate_photo_file_name_with_extension(
    sequence: impl IntoSequence,
    extension: &str,
) -> Result<String, NamingError> {
    let sequence = sequence.into_sequence()?;
    Ok(format_name('P', sequence, extension))
}

/// Generates a drawing delivery name
///
/// The extension is mandatory and must normalize into the drawing-supported
/// set (`JPG`, `TIF`, `PDF`).
pub fn generate_drawing_file_name(
    sequence: impl IntoSequence,
    extension: &str,
) -> Result<String, NamingError> {
    let sequence = sequence.into_sequence()?;
    let normalized = normalize_extension(extension);
    if !DRAWING_EXTENSIONS.contains(&normalized.as_str()) {
        return Err(NamingError::UnsupportedDrawingExtension(extension.to_string()));
    }
    Ok(format_name('D', sequence, &normalized))
}

/// Extracts the sequence number from a delivery name
///
/// Returns `None` when the name does not follow the `[PD]NNNNNNN.ext`
/// grammar; a missing number is an expected outcome, not an error.
///
/// # Examples
///
/// ```
/// use photopack::core::naming::extract_sequence_number;
///
/// assert_eq!(extract_sequence_number("p0000042.jpg"), Some(42));
/// assert_eq!(extract_sequence_number("IMG_0042.JPG"), None);
/// ```
pub fn extract_sequence_number(name: &str) -> Option<u32> {
    SEQUENCE_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Whether `name` is a well-formed photo delivery name
pub fn is_valid_photo_file_name(name: &str) -> bool {
    PHOTO_NAME.is_match(name)
}

/// Whether `name` is a well-formed drawing delivery name
pub fn is_valid_drawing_file_name(name: &str) -> bool {
    DRAWING_NAME.is_match(name)
}

/// Whether `name` is a well-formed photo or drawing delivery name
pub fn is_valid_delivery_file_name(name: &str) -> bool {
    is_valid_photo_file_name(name) || is_valid_drawing_file_name(name)
}
