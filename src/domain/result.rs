//! Result type alias for photopack

use super::errors::PhotopackError;

/// Result type alias for photopack operations
///
/// # Examples
///
/// ```
/// use photopack::domain::result::Result;
/// use photopack::domain::errors::PhotopackError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PhotopackError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PhotopackError>;
