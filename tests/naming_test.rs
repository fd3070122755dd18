//! Integration tests for delivery file naming

use photopack::core::naming::{
    extract_sequence_number, generate_drawing_file_name, generate_photo_file_name,
    generate_photo_file_name_with_extension, is_valid_delivery_file_name,
    is_valid_drawing_file_name, is_valid_photo_file_name, SequenceNameGenerator,
};
use photopack::domain::NamingError;
use test_case::test_case;

#[test_case(1, "P0000001.JPG" ; "first")]
#[test_case(42, "P0000042.JPG" ; "padded")]
#[test_case(1_234_567, "P1234567.JPG" ; "seven digits")]
#[test_case(9_999_999, "P9999999.JPG" ; "last")]
fn test_photo_names(sequence: i64, expected: &str) {
    assert_eq!(generate_photo_file_name(sequence).unwrap(), expected);
}

#[test_case(0 ; "zero")]
#[test_case(-1 ; "negative")]
fn test_photo_sequence_below_range(sequence: i64) {
    assert!(matches!(
        generate_photo_file_name(sequence),
        Err(NamingError::BelowMinimum(_))
    ));
}

#[test]
fn test_photo_sequence_above_range() {
    assert!(matches!(
        generate_photo_file_name(10_000_000i64),
        Err(NamingError::AboveMaximum(10_000_000))
    ));
}

#[test_case(1.5 ; "fraction")]
#[test_case(f64::NAN ; "nan")]
fn test_photo_sequence_not_integer(sequence: f64) {
    assert!(matches!(
        generate_photo_file_name(sequence),
        Err(NamingError::NotAnInteger(_))
    ));
}

#[test_case("jpeg", "P0000007.JPG" ; "jpeg folds to jpg")]
#[test_case(".tiff", "P0000007.TIF" ; "leading dot and tiff")]
#[test_case("Tif", "P0000007.TIF" ; "mixed case")]
fn test_photo_extension_normalization(extension: &str, expected: &str) {
    assert_eq!(
        generate_photo_file_name_with_extension(7, extension).unwrap(),
        expected
    );
}

#[test_case("pdf", "D0000003.PDF" ; "pdf")]
#[test_case("JPEG", "D0000003.JPG" ; "jpeg")]
#[test_case("tiff", "D0000003.TIF" ; "tiff")]
fn test_drawing_names(extension: &str, expected: &str) {
    assert_eq!(generate_drawing_file_name(3, extension).unwrap(), expected);
}

#[test_case("png" ; "png")]
#[test_case("dwg" ; "dwg")]
#[test_case("" ; "empty")]
fn test_drawing_unsupported_extension(extension: &str) {
    assert!(matches!(
        generate_drawing_file_name(1, extension),
        Err(NamingError::UnsupportedDrawingExtension(_))
    ));
}

#[test_case("P0000042.JPG", Some(42) ; "photo")]
#[test_case("D0000100.PDF", Some(100) ; "drawing")]
#[test_case("p0000005.jpg", Some(5) ; "lower case")]
#[test_case("P000042.JPG", None ; "six digits")]
#[test_case("X0000001.JPG", None ; "wrong prefix")]
#[test_case("P0000001", None ; "no extension")]
#[test_case("P０００００００１.JPG", None ; "full width digits")]
#[test_case("P0000001.ＪＰＧ", None ; "full width extension")]
fn test_extract_sequence_number(name: &str, expected: Option<u32>) {
    assert_eq!(extract_sequence_number(name), expected);
}

#[test_case("P0000001.JPG", true, false ; "photo jpg")]
#[test_case("P0000001.TIFF", true, false ; "photo tiff")]
#[test_case("P0000001.PDF", false, false ; "photo pdf")]
#[test_case("D0000001.PDF", false, true ; "drawing pdf")]
#[test_case("D0000001.JPEG", false, false ; "drawing jpeg")]
#[test_case("P０００００００１.JPG", false, false ; "photo full width digits")]
#[test_case("D٠٠٠٠٠٠١.PDF", false, false ; "drawing arabic indic digits")]
fn test_name_grammar(name: &str, photo: bool, drawing: bool) {
    assert_eq!(is_valid_photo_file_name(name), photo);
    assert_eq!(is_valid_drawing_file_name(name), drawing);
    assert_eq!(is_valid_delivery_file_name(name), photo || drawing);
}

#[test]
fn test_generated_names_round_trip_through_extraction() {
    let mut generator = SequenceNameGenerator::new();
    for expected in 1..=25u32 {
        let name = generator.next_photo_file_name().unwrap();
        assert!(is_valid_photo_file_name(&name));
        assert_eq!(extract_sequence_number(&name), Some(expected));
    }
    assert_eq!(generator.current_photo_number(), 25);
}

#[test]
fn test_generator_start_and_reset() {
    let mut generator = SequenceNameGenerator::with_start(10, 5);
    assert_eq!(generator.next_photo_file_name().unwrap(), "P0000010.JPG");
    assert_eq!(generator.next_drawing_file_name("pdf").unwrap(), "D0000005.PDF");
    assert_eq!(generator.current_photo_number(), 1);

    generator.reset(None, Some(3));
    assert_eq!(generator.current_photo_number(), 0);
    assert_eq!(generator.next_photo_file_name().unwrap(), "P0000001.JPG");
    assert_eq!(generator.next_drawing_file_name("pdf").unwrap(), "D0000003.PDF");
}

#[test]
fn test_unsupported_drawing_does_not_advance_counter() {
    let mut generator = SequenceNameGenerator::new();
    assert!(generator.next_drawing_file_name("png").is_err());
    assert_eq!(generator.current_drawing_number(), 0);
    assert_eq!(generator.next_drawing_file_name("pdf").unwrap(), "D0000001.PDF");
}

#[test]
fn test_generator_stops_at_upper_bound() {
    let mut generator = SequenceNameGenerator::with_start(9_999_999, 1);
    assert_eq!(generator.next_photo_file_name().unwrap(), "P9999999.JPG");
    assert!(matches!(
        generator.next_photo_file_name(),
        Err(NamingError::AboveMaximum(10_000_000))
    ));
}
