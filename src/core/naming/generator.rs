//! Per-job sequence name generator
//!
//! One generator is created for each export job and passed explicitly through
//! the assembler. It is deliberately not `Clone`: the counters it holds are
//! the authoritative sequence for one job's metadata document and archive.

use super::{
    generate_drawing_file_name, generate_photo_file_name_with_extension, DEFAULT_PHOTO_EXTENSION,
    MIN_SEQUENCE,
};
use crate::domain::NamingError;

/// Stateful generator issuing contiguous photo and drawing delivery names
///
/// # Examples
///
/// ```
/// use photopack::core::naming::SequenceNameGenerator;
///
/// let mut generator = SequenceNameGenerator::new();
/// assert_eq!(generator.next_photo_file_name().unwrap(), "P0000001.JPG");
/// assert_eq!(generator.next_drawing_file_name("PDF").unwrap(), "D0000001.PDF");
/// assert_eq!(generator.next_photo_file_name().unwrap(), "P0000002.JPG");
/// assert_eq!(generator.current_photo_number(), 2);
/// ```
#[derive(Debug)]
pub struct SequenceNameGenerator {
    photo_start: u32,
    photo_next: u32,
    drawing_start: u32,
    drawing_next: u32,
}

impl SequenceNameGenerator {
    /// Creates a generator with both counters starting at 1
    pub fn new() -> Self {
        Self::with_start(MIN_SEQUENCE, MIN_SEQUENCE)
    }

    /// Creates a generator with explicit start values
    pub fn with_start(photo_start: u32, drawing_start: u32) -> Self {
        Self {
            photo_start,
            photo_next: photo_start,
            drawing_start,
            drawing_next: drawing_start,
        }
    }

    /// Issues the next photo name with the default extension
    pub fn next_photo_file_name(&mut self) -> Result<String, NamingError> {
        self.next_photo_file_name_with_extension(DEFAULT_PHOTO_EXTENSION)
    }

    /// Issues the next photo name with an explicit extension
    ///
    /// The counter only advances when a name is produced.
    pub fn next_photo_file_name_with_extension(
        &mut self,
        extension: &str,
    ) -> Result<String, NamingError> {
        let name = generate_photo_file_name_with_extension(self.photo_next, extension)?;
        self.photo_next += 1;
        Ok(name)
    }

    /// Issues the next drawing name
    pub fn next_drawing_file_name(&mut self, extension: &str) -> Result<String, NamingError> {
        let name = generate_drawing_file_name(self.drawing_next, extension)?;
        self.drawing_next += 1;
        Ok(name)
    }

    /// Number of photo names issued so far
    pub fn current_photo_number(&self) -> u32 {
        self.photo_next - self.photo_start
    }

    /// Number of drawing names issued so far
    pub fn current_drawing_number(&self) -> u32 {
        self.drawing_next - self.drawing_start
    }

    /// Sequence number the next photo name will carry
    pub fn peek_photo_sequence(&self) -> u32 {
        self.photo_next
    }

    /// Sequence number the next drawing name will carry
    pub fn peek_drawing_sequence(&self) -> u32 {
        self.drawing_next
    }

    /// Reinitializes the counters; unset arguments default to 1
    pub fn reset(&mut self, photo_start: Option<u32>, drawing_start: Option<u32>) {
        *self = Self::with_start(
            photo_start.unwrap_or(MIN_SEQUENCE),
            drawing_start.unwrap_or(MIN_SEQUENCE),
        );
    }
}

impl Default for SequenceNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_generator_sequence() {
        let mut generator = SequenceNameGenerator::new();
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000001.JPG");
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000002.JPG");
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000003.JPG");
        assert_eq!(generator.current_photo_number(), 3);
        assert_eq!(generator.current_drawing_number(), 0);
    }

    #[test]
    fn test_interleaving_keeps_counters_independent() {
        let mut generator = SequenceNameGenerator::new();
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000001.JPG");
        assert_eq!(generator.next_drawing_file_name("PDF").unwrap(), "D0000001.PDF");
        assert_eq!(generator.next_drawing_file_name("pdf").unwrap(), "D0000002.PDF");
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000002.JPG");
    }

    #[test]
    fn test_custom_start_values() {
        let mut generator = SequenceNameGenerator::with_start(100, 50);
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000100.JPG");
        assert_eq!(generator.next_drawing_file_name("PDF").unwrap(), "D0000050.PDF");
        assert_eq!(generator.current_photo_number(), 1);
        assert_eq!(generator.current_drawing_number(), 1);
    }

    #[test]
    fn test_reset() {
        let mut generator = SequenceNameGenerator::new();
        generator.next_photo_file_name().unwrap();
        generator.next_drawing_file_name("TIF").unwrap();

        generator.reset(Some(10), Some(5));
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000010.JPG");
        assert_eq!(generator.next_drawing_file_name("TIF").unwrap(), "D0000005.TIF");

        generator.reset(None, None);
        assert_eq!(generator.current_photo_number(), 0);
        assert_eq!(generator.next_photo_file_name().unwrap(), "P0000001.JPG");
    }

    #[test]
    fn test_failed_name_does_not_advance() {
        let mut generator = SequenceNameGenerator::new();
        assert!(generator.next_drawing_file_name("DWG").is_err());
        assert_eq!(generator.current_drawing_number(), 0);
        assert_eq!(generator.next_drawing_file_name("PDF").unwrap(), "D0000001.PDF");
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut generator = SequenceNameGenerator::with_start(9_999_999, 1);
        assert_eq!(generator.next_photo_file_name().unwrap(), "P9999999.JPG");
        assert_eq!(
            generator.next_photo_file_name(),
            Err(NamingError::AboveMaximum(10_000_000))
        );
    }

    #[test]
    fn test_zero_start_is_rejected_on_use() {
        let mut generator = SequenceNameGenerator::with_start(0, 1);
        assert_eq!(
            generator.next_photo_file_name(),
            Err(NamingError::BelowMinimum(0))
        );
    }
}
