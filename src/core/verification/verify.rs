//! Offline verification of an expanded delivery package
//!
//! Checks that the metadata document is present at the package root, that
//! every file in the photo and drawing folders carries a well-formed delivery
//! name, and that each folder's sequence numbers run 1..=n without gaps or
//! duplicates. When a copy manifest is supplied, file checksums are compared
//! against it as well.

use crate::core::assembly::PackageLayout;
use crate::core::export::CopiedFile;
use crate::core::naming::{
    extract_sequence_number, is_valid_drawing_file_name, is_valid_photo_file_name,
};
use crate::core::verification::checksum::calculate_file_checksum;
use crate::core::verification::report::VerificationReport;
use crate::domain::{PhotopackError, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Verifier for expanded delivery packages
pub struct Verifier {
    layout: PackageLayout,
}

impl Verifier {
    /// Create a verifier for packages laid out as `layout`
    pub fn new(layout: PackageLayout) -> Self {
        Self { layout }
    }

    /// Verify the package rooted at `package_dir`
    ///
    /// # Errors
    ///
    /// Returns [`PhotopackError::Validation`] when `package_dir` is not a
    /// directory and an I/O error when a folder cannot be listed. Problems
    /// with the package contents are reported in the returned report.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use photopack::core::assembly::PackageLayout;
    /// use photopack::core::verification::Verifier;
    ///
    /// let verifier = Verifier::new(PackageLayout::default());
    /// let report = verifier.verify_package("out/PHOTO", None).unwrap();
    /// println!("{}", report.format_summary());
    /// ```
    pub fn verify_package(
        &self,
        package_dir: impl AsRef<Path>,
        manifest: Option<&[CopiedFile]>,
    ) -> Result<VerificationReport> {
        let start = Instant::now();
        let package_dir = package_dir.as_ref();
        if !package_dir.is_dir() {
            return Err(PhotopackError::Validation(format!(
                "Package directory not found: {}",
                package_dir.display()
            )));
        }

        tracing::info!(package_dir = %package_dir.display(), "Starting package verification");
        let mut report = VerificationReport::new(package_dir);

        if !package_dir.join(&self.layout.metadata_file).is_file() {
            report.record_problem(&self.layout.metadata_file, "Metadata document missing");
        }

        let photo_dir = package_dir.join(&self.layout.photo_folder);
        if photo_dir.is_dir() {
            self.check_folder(
                &photo_dir,
                &self.layout.photo_folder,
                'P',
                is_valid_photo_file_name,
                &mut report,
            )?;
        } else {
            report.record_problem(&self.layout.photo_folder, "Photo folder missing");
        }

        let drawing_dir = package_dir.join(&self.layout.drawing_folder);
        if drawing_dir.is_dir() {
            self.check_folder(
                &drawing_dir,
                &self.layout.drawing_folder,
                'D',
                is_valid_drawing_file_name,
                &mut report,
            )?;
        }

        if let Some(manifest) = manifest {
            verify_checksums(package_dir, manifest, &mut report);
        }

        report.set_duration(start.elapsed().as_millis() as u64);
        tracing::info!(
            total_verified = report.total_verified,
            failed = report.failed,
            problems = report.failures.len(),
            "Package verification completed"
        );
        Ok(report)
    }

    fn check_folder(
        &self,
        dir: &Path,
        folder: &str,
        prefix: char,
        is_valid: fn(&str) -> bool,
        report: &mut VerificationReport,
    ) -> Result<()> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = format!("{folder}/{name}");
            if entry.file_type()?.is_dir() {
                report.record_problem(path, "Unexpected subfolder");
                continue;
            }
            names.push(name);
        }
        names.sort();

        let mut sequences = Vec::with_capacity(names.len());
        for name in &names {
            let path = format!("{folder}/{name}");
            if !is_valid(name) {
                report.record_failure(path, format!("Not a valid {prefix}-series delivery name"));
                continue;
            }
            if *name != name.to_ascii_uppercase() {
                report.record_failure(path, "Delivery names must be upper case");
                continue;
            }
            match extract_sequence_number(name) {
                Some(sequence) => {
                    sequences.push((sequence, path));
                    report.record_pass();
                }
                None => report.record_failure(path, "Sequence number unreadable"),
            }
        }

        sequences.sort();
        let mut expected = 1u32;
        for (sequence, path) in sequences {
            if sequence < expected {
                report.record_problem(path, format!("Duplicate sequence number {sequence}"));
                continue;
            }
            if sequence > expected {
                report.record_problem(
                    path,
                    format!("Sequence gap: expected {prefix}{expected:07} before {prefix}{sequence:07}"),
                );
            }
            expected = sequence + 1;
        }

        Ok(())
    }
}

fn verify_checksums(package_dir: &Path, manifest: &[CopiedFile], report: &mut VerificationReport) {
    for copied in manifest {
        let path = package_dir.join(&copied.relative_path);
        match calculate_file_checksum(&path) {
            Ok(actual) if actual == copied.sha256 => report.checksums_verified += 1,
            Ok(actual) => report.record_problem(
                &copied.relative_path,
                format!("Checksum mismatch: expected {}, found {actual}", copied.sha256),
            ),
            Err(e) => report.record_problem(&copied.relative_path, format!("Unreadable: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::verification::checksum::calculate_checksum_bytes;
    use tempfile::TempDir;

    fn package(photos: &[&str], drawings: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("PHOTO05.XML"), b"<photodata/>").unwrap();
        fs::create_dir(dir.path().join("PIC")).unwrap();
        for name in photos {
            fs::write(dir.path().join("PIC").join(name), name.as_bytes()).unwrap();
        }
        if !drawings.is_empty() {
            fs::create_dir(dir.path().join("DRA")).unwrap();
            for name in drawings {
                fs::write(dir.path().join("DRA").join(name), name.as_bytes()).unwrap();
            }
        }
        dir
    }

    #[test]
    fn test_well_formed_package_passes() {
        let dir = package(
            &["P0000001.JPG", "P0000002.JPG", "P0000003.TIF"],
            &["D0000001.PDF"],
        );
        let report = Verifier::new(PackageLayout::default())
            .verify_package(dir.path(), None)
            .unwrap();

        assert!(report.is_success(), "{}", report.format_summary());
        assert_eq!(report.total_verified, 4);
        assert_eq!(report.passed, 4);
    }

    #[test]
    fn test_gap_is_reported() {
        let dir = package(&["P0000001.JPG", "P0000003.JPG"], &[]);
        let report = Verifier::new(PackageLayout::default())
            .verify_package(dir.path(), None)
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("expected P0000002"));
    }

    #[test]
    fn test_duplicate_sequence_is_reported() {
        let dir = package(&["P0000001.JPG", "P0000001.TIF"], &[]);
        let report = Verifier::new(PackageLayout::default())
            .verify_package(dir.path(), None)
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("Duplicate"));
    }

    #[test]
    fn test_bad_names_and_missing_metadata() {
        let dir = package(&["P0000001.JPG", "IMG_0042.JPG", "p0000002.jpg"], &[]);
        fs::remove_file(dir.path().join("PHOTO05.XML")).unwrap();

        let report = Verifier::new(PackageLayout::default())
            .verify_package(dir.path(), None)
            .unwrap();

        assert_eq!(report.failed, 2);
        assert!(report
            .failures
            .iter()
            .any(|f| f.path == "PHOTO05.XML" && f.reason.contains("missing")));
    }

    #[test]
    fn test_drawing_in_photo_folder_fails() {
        let dir = package(&["P0000001.JPG", "D0000001.PDF"], &[]);
        let report = Verifier::new(PackageLayout::default())
            .verify_package(dir.path(), None)
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].path, "PIC/D0000001.PDF");
    }

    #[test]
    fn test_checksums_against_manifest() {
        let dir = package(&["P0000001.JPG", "P0000002.JPG"], &[]);
        let manifest = vec![
            CopiedFile {
                delivery_name: "P0000001.JPG".to_string(),
                relative_path: "PIC/P0000001.JPG".to_string(),
                bytes: 12,
                sha256: calculate_checksum_bytes(b"P0000001.JPG"),
            },
            CopiedFile {
                delivery_name: "P0000002.JPG".to_string(),
                relative_path: "PIC/P0000002.JPG".to_string(),
                bytes: 12,
                sha256: calculate_checksum_bytes(b"something else"),
            },
        ];

        let report = Verifier::new(PackageLayout::default())
            .verify_package(dir.path(), Some(&manifest))
            .unwrap();

        assert_eq!(report.checksums_verified, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].reason.contains("Checksum mismatch"));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let result =
            Verifier::new(PackageLayout::default()).verify_package(dir.path().join("nope"), None);
        assert!(matches!(result, Err(PhotopackError::Validation(_))));
    }
}
