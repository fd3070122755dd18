//! Verification report structures
//!
//! This module defines the structures for reporting package verification results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of an offline check of an expanded delivery package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Package root that was checked
    pub package_dir: PathBuf,

    /// Total number of files checked
    pub total_verified: usize,

    /// Number of files that passed every check
    pub passed: usize,

    /// Number of files that failed a check
    pub failed: usize,

    /// Number of checksums compared against a copy manifest
    pub checksums_verified: usize,

    /// Failures in discovery order
    pub failures: Vec<VerificationFailure>,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

/// Details of a failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Path relative to the package root
    pub path: String,

    /// Reason for failure
    pub reason: String,
}

impl VerificationReport {
    /// Create an empty report for `package_dir`
    pub fn new(package_dir: impl Into<PathBuf>) -> Self {
        Self {
            verified_at: Utc::now(),
            package_dir: package_dir.into(),
            total_verified: 0,
            passed: 0,
            failed: 0,
            checksums_verified: 0,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record a file that passed
    pub fn record_pass(&mut self) {
        self.total_verified += 1;
        self.passed += 1;
    }

    /// Record a file that failed
    pub fn record_failure(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.total_verified += 1;
        self.failed += 1;
        self.record_problem(path, reason);
    }

    /// Record a package-level problem that is not tied to one counted file
    pub fn record_problem(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(VerificationFailure {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Set the duration of verification
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// True when nothing failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("🔍 Package Verification\n");
        summary.push_str(&format!("  Package: {}\n", self.package_dir.display()));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Files checked: {}\n", self.total_verified));
        summary.push_str(&format!("  ✅ Passed: {}\n", self.passed));
        summary.push_str(&format!("  ❌ Failed: {}\n", self.failed));
        if self.checksums_verified > 0 {
            summary.push_str(&format!(
                "  Checksums verified: {}\n",
                self.checksums_verified
            ));
        }

        if !self.failures.is_empty() {
            summary.push_str("\n❌ Problems:\n");
            for (i, failure) in self.failures.iter().enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, failure.path));
                summary.push_str(&format!("     Reason: {}\n", failure.reason));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_report_new() {
        let report = VerificationReport::new("/tmp/PHOTO");
        assert_eq!(report.total_verified, 0);
        assert!(report.failures.is_empty());
        assert!(report.is_success());
    }

    #[test]
    fn test_record_failure() {
        let mut report = VerificationReport::new("/tmp/PHOTO");
        report.record_pass();
        report.record_failure("PIC/photo.jpg", "Not a valid photo file name");

        assert_eq!(report.total_verified, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_package_problem_fails_without_counting_a_file() {
        let mut report = VerificationReport::new("/tmp/PHOTO");
        report.record_problem("PHOTO05.XML", "Metadata document missing");

        assert_eq!(report.total_verified, 0);
        assert!(!report.is_success());
    }

    #[test]
    fn test_format_summary() {
        let mut report = VerificationReport::new("/tmp/PHOTO");
        report.record_pass();
        report.record_failure("PIC/P0000003.JPG", "Sequence gap: expected P0000002");
        report.set_duration(15);

        let summary = report.format_summary();
        assert!(summary.contains("Files checked: 2"));
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("Sequence gap"));
        assert!(summary.contains("Duration: 15 ms"));
    }
}
