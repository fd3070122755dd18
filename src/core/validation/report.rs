//! Validation report structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable finding codes
pub mod codes {
    /// A delivery name does not match the grammar for its category
    pub const INVALID_FILE_NAME: &str = "INVALID_FILE_NAME";
    /// Sequence numbers of a category are not exactly `1..N`
    pub const SEQUENCE_GAP: &str = "SEQUENCE_GAP";
    /// A photo links a drawing that is not in the package
    pub const MISSING_DRAWING_FILE: &str = "MISSING_DRAWING_FILE";
    /// A photo record lacks a required field
    pub const MISSING_REQUIRED_FIELD: &str = "MISSING_REQUIRED_FIELD";
    /// A classification code is outside the recognized set
    pub const UNRECOGNIZED_CLASSIFICATION: &str = "UNRECOGNIZED_CLASSIFICATION";
    /// Photo records and photo entries do not correspond one to one
    pub const METADATA_MISMATCH: &str = "METADATA_MISMATCH";
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the package
    Error,
    /// Reported, never blocks
    Warning,
}

/// One rule finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable code
    pub code: String,
    /// Error or warning
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Delivery name the finding refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Metadata field the finding refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Finding {
    /// Creates an error finding
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
            file: None,
            field: None,
        }
    }

    /// Creates a warning finding
    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    /// Attaches the target file
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attaches the target field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Verdict for one assembled package
///
/// Built once by the validation engine and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    validated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Splits findings into errors and warnings, keeping their order
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let (errors, warnings) = findings
            .into_iter()
            .partition(|finding| finding.severity == Severity::Error);
        Self {
            errors,
            warnings,
            validated_at: Utc::now(),
        }
    }

    /// True iff there are no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Blocking findings
    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    /// Non-blocking findings
    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    /// When the report was produced
    pub fn validated_at(&self) -> DateTime<Utc> {
        self.validated_at
    }

    /// Number of errors carrying `code`
    pub fn count_code(&self, code: &str) -> usize {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(|finding| finding.code == code)
            .count()
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("📋 Validation Report\n");
        summary.push_str(&format!("  Validated at: {}\n", self.validated_at));
        summary.push_str(&format!(
            "  Result: {}\n",
            if self.is_valid() { "✅ valid" } else { "❌ invalid" }
        ));
        summary.push_str(&format!("  Errors: {}\n", self.errors.len()));
        summary.push_str(&format!("  Warnings: {}\n", self.warnings.len()));

        for (label, findings) in [("❌ Errors", &self.errors), ("⚠️  Warnings", &self.warnings)] {
            if findings.is_empty() {
                continue;
            }
            summary.push_str(&format!("\n{label}:\n"));
            for finding in findings {
                summary.push_str(&format!("  - [{}] {}", finding.code, finding.message));
                if let Some(file) = &finding.file {
                    summary.push_str(&format!(" (file: {file})"));
                }
                if let Some(field) = &finding.field {
                    summary.push_str(&format!(" (field: {field})"));
                }
                summary.push('\n');
            }
        }

        summary
    }
}
