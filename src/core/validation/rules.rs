//! Standard validation rules
//!
//! Each rule is a pure function of the assembled package. Rules never fail;
//! they only report findings.

use super::report::{codes, Finding};
use super::PackageView;
use crate::config::ClassificationConfig;
use crate::core::assembly::{DeliveryFileEntry, EntryKind};
use crate::core::naming::{
    extract_sequence_number, is_valid_drawing_file_name, is_valid_photo_file_name,
};
use std::collections::{BTreeMap, HashSet};

/// A validation rule
pub trait ValidationRule: Send + Sync {
    /// Rule name, for logs and registry listings
    fn name(&self) -> &str;

    /// Checks the package and reports findings
    fn check(&self, package: &PackageView<'_>) -> Vec<Finding>;
}

/// Rule built from a closure
pub struct FnRule<F> {
    name: String,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&PackageView<'_>) -> Vec<Finding> + Send + Sync,
{
    /// Wraps a closure as a rule
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> ValidationRule for FnRule<F>
where
    F: Fn(&PackageView<'_>) -> Vec<Finding> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        (self.check)(package)
    }
}

/// Every delivery name matches the grammar of its category
pub struct FileNameRule;

impl ValidationRule for FileNameRule {
    fn name(&self) -> &str {
        "file_name"
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        package
            .plan
            .entries()
            .filter(|entry| {
                let valid = match entry.kind {
                    EntryKind::Photo => is_valid_photo_file_name(&entry.delivery_name),
                    EntryKind::Drawing => is_valid_drawing_file_name(&entry.delivery_name),
                };
                !valid
            })
            .map(|entry| {
                Finding::error(
                    codes::INVALID_FILE_NAME,
                    format!(
                        "{} is not a valid {} delivery name",
                        entry.delivery_name,
                        kind_label(entry.kind)
                    ),
                )
                .with_file(&entry.delivery_name)
            })
            .collect()
    }
}

/// Sequence numbers of each category are exactly `1..N`
pub struct SequenceContiguityRule;

impl SequenceContiguityRule {
    fn check_category(entries: &[DeliveryFileEntry], kind: EntryKind) -> Vec<Finding> {
        let mut seen: BTreeMap<u32, usize> = BTreeMap::new();
        for entry in entries {
            if let Some(sequence) = extract_sequence_number(&entry.delivery_name) {
                *seen.entry(sequence).or_default() += 1;
            }
        }

        let label = kind_label(kind);
        let expected_max = entries.len() as u32;
        let mut findings = Vec::new();

        for (sequence, count) in &seen {
            if *count > 1 {
                findings.push(Finding::error(
                    codes::SEQUENCE_GAP,
                    format!("{label} sequence {sequence} is used {count} times"),
                ));
            }
            if *sequence > expected_max {
                findings.push(Finding::error(
                    codes::SEQUENCE_GAP,
                    format!("{label} sequence {sequence} is outside 1..{expected_max}"),
                ));
            }
        }

        for sequence in 1..=expected_max {
            if !seen.contains_key(&sequence) {
                findings.push(Finding::error(
                    codes::SEQUENCE_GAP,
                    format!("{label} sequence {sequence} is missing"),
                ));
            }
        }

        findings
    }
}

impl ValidationRule for SequenceContiguityRule {
    fn name(&self) -> &str {
        "sequence_contiguity"
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        let mut findings = Self::check_category(&package.plan.photos, EntryKind::Photo);
        findings.extend(Self::check_category(
            &package.plan.drawings,
            EntryKind::Drawing,
        ));
        findings
    }
}

/// Linked drawings exist among the drawing entries
pub struct DrawingLinkRule;

impl ValidationRule for DrawingLinkRule {
    fn name(&self) -> &str {
        "drawing_link"
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        let drawings: HashSet<&str> = package
            .plan
            .drawings
            .iter()
            .map(|entry| entry.delivery_name.as_str())
            .collect();

        package
            .document
            .photos
            .iter()
            .filter_map(|record| {
                let linked = record.linked_drawing.as_deref()?;
                if drawings.contains(linked) {
                    return None;
                }
                Some(
                    Finding::error(
                        codes::MISSING_DRAWING_FILE,
                        format!(
                            "{} links drawing {} which is not in the package",
                            record.file_name, linked
                        ),
                    )
                    .with_file(&record.file_name)
                    .with_field("drawingFileName"),
                )
            })
            .collect()
    }
}

/// Title and shooting date are present on every photo record
pub struct RequiredFieldsRule;

impl ValidationRule for RequiredFieldsRule {
    fn name(&self) -> &str {
        "required_fields"
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for record in &package.document.photos {
            let fields = [
                ("title", Some(record.title.as_str())),
                ("shootingDate", record.shooting_date.as_deref()),
            ];
            for (field, value) in fields {
                if value.map_or(true, |v| v.trim().is_empty()) {
                    findings.push(
                        Finding::error(
                            codes::MISSING_REQUIRED_FIELD,
                            format!("{} has no {}", record.file_name, field),
                        )
                        .with_file(&record.file_name)
                        .with_field(field),
                    );
                }
            }
        }
        findings
    }
}

/// Recognized classification code sets
///
/// An empty set accepts any value at that level.
#[derive(Debug, Clone, Default)]
pub struct ClassificationCodes {
    /// Recognized major categories
    pub major_categories: HashSet<String>,
    /// Recognized photo categories
    pub categories: HashSet<String>,
    /// Recognized work types
    pub work_types: HashSet<String>,
    /// Recognized detail types
    pub detail_types: HashSet<String>,
}

impl ClassificationCodes {
    /// Builds the code sets from configuration
    pub fn from_config(config: &ClassificationConfig) -> Self {
        let set = |values: &[String]| values.iter().cloned().collect::<HashSet<_>>();
        Self {
            major_categories: set(&config.recognized_major_categories),
            categories: set(&config.recognized_categories),
            work_types: set(&config.recognized_work_types),
            detail_types: set(&config.recognized_detail_types),
        }
    }
}

/// Classification codes belong to the recognized sets
pub struct ClassificationRule {
    codes: ClassificationCodes,
}

impl ClassificationRule {
    /// Creates the rule for a set of recognized codes
    pub fn new(codes: ClassificationCodes) -> Self {
        Self { codes }
    }
}

impl ValidationRule for ClassificationRule {
    fn name(&self) -> &str {
        "classification"
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();
        for record in &package.document.photos {
            let checks = [
                (
                    "majorCategory",
                    Some(record.major_category.as_str()),
                    &self.codes.major_categories,
                ),
                ("category", Some(record.category.as_str()), &self.codes.categories),
                ("workType", record.work_type.as_deref(), &self.codes.work_types),
                ("detailType", record.detail_type.as_deref(), &self.codes.detail_types),
            ];
            for (field, value, known) in checks {
                let Some(value) = value else { continue };
                if known.is_empty() || known.contains(value) {
                    continue;
                }
                findings.push(
                    Finding::warning(
                        codes::UNRECOGNIZED_CLASSIFICATION,
                        format!("{} has unrecognized {} '{}'", record.file_name, field, value),
                    )
                    .with_file(&record.file_name)
                    .with_field(field),
                );
            }
        }
        findings
    }
}

/// Photo records correspond one to one with photo entries
pub struct MetadataCoverageRule;

impl ValidationRule for MetadataCoverageRule {
    fn name(&self) -> &str {
        "metadata_coverage"
    }

    fn check(&self, package: &PackageView<'_>) -> Vec<Finding> {
        let planned: HashSet<&str> = package
            .plan
            .photos
            .iter()
            .map(|entry| entry.delivery_name.as_str())
            .collect();
        let described: HashSet<&str> = package
            .document
            .photos
            .iter()
            .map(|record| record.file_name.as_str())
            .collect();

        let mut findings: Vec<Finding> = package
            .plan
            .photos
            .iter()
            .filter(|entry| !described.contains(entry.delivery_name.as_str()))
            .map(|entry| {
                Finding::error(
                    codes::METADATA_MISMATCH,
                    format!("{} has no metadata record", entry.delivery_name),
                )
                .with_file(&entry.delivery_name)
            })
            .collect();

        findings.extend(
            package
                .document
                .photos
                .iter()
                .filter(|record| !planned.contains(record.file_name.as_str()))
                .map(|record| {
                    Finding::error(
                        codes::METADATA_MISMATCH,
                        format!("metadata record {} has no photo file", record.file_name),
                    )
                    .with_file(&record.file_name)
                }),
        );

        findings
    }
}

fn kind_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Photo => "photo",
        EntryKind::Drawing => "drawing",
    }
}
