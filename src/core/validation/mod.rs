//! Package validation
//!
//! The engine runs an ordered registry of rules over an assembled package
//! (metadata document plus folder plan) and returns a [`ValidationReport`].
//! Rules are pure: validating the same package twice yields the same
//! findings.

pub mod engine;
pub mod report;
pub mod rules;

pub use engine::ValidationEngine;
pub use report::{codes, Finding, Severity, ValidationReport};
pub use rules::{ClassificationCodes, FnRule, ValidationRule};

use crate::core::assembly::FolderPlan;
use crate::core::metadata::PackageMetadataDocument;

/// Borrowed view of an assembled package
#[derive(Debug, Clone, Copy)]
pub struct PackageView<'a> {
    /// Metadata document
    pub document: &'a PackageMetadataDocument,
    /// Folder plan
    pub plan: &'a FolderPlan,
}

impl<'a> PackageView<'a> {
    /// Creates a view
    pub fn new(document: &'a PackageMetadataDocument, plan: &'a FolderPlan) -> Self {
        Self { document, plan }
    }
}
