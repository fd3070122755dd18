//! Validation engine - ordered rule registry

use super::report::{Finding, ValidationReport};
use super::rules::{
    ClassificationCodes, ClassificationRule, DrawingLinkRule, FileNameRule, FnRule,
    MetadataCoverageRule, RequiredFieldsRule, SequenceContiguityRule, ValidationRule,
};
use super::PackageView;

/// Runs registered rules in order and collects their findings
///
/// The engine holds no state besides its rules, so one engine may validate
/// any number of packages; each export job still builds its own.
///
/// # Examples
///
/// ```
/// use photopack::core::validation::{ClassificationCodes, ValidationEngine};
///
/// let engine = ValidationEngine::standard(ClassificationCodes::default());
/// assert_eq!(engine.rule_names()[0], "file_name");
/// ```
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Creates an engine with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates an engine with the standard rule set
    pub fn standard(codes: ClassificationCodes) -> Self {
        let mut engine = Self::new();
        engine
            .register(FileNameRule)
            .register(SequenceContiguityRule)
            .register(DrawingLinkRule)
            .register(RequiredFieldsRule)
            .register(ClassificationRule::new(codes))
            .register(MetadataCoverageRule);
        engine
    }

    /// Appends a rule
    pub fn register(&mut self, rule: impl ValidationRule + 'static) -> &mut Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Appends a closure as a rule
    pub fn register_fn<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&PackageView<'_>) -> Vec<Finding> + Send + Sync + 'static,
    {
        self.register(FnRule::new(name, check))
    }

    /// Names of registered rules, in run order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Runs every rule against the package
    pub fn validate(&self, package: &PackageView<'_>) -> ValidationReport {
        let mut findings = Vec::new();
        for rule in &self.rules {
            let found = rule.check(package);
            if !found.is_empty() {
                tracing::debug!(rule = rule.name(), count = found.len(), "Rule reported findings");
            }
            findings.extend(found);
        }
        ValidationReport::from_findings(findings)
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::standard(ClassificationCodes::default())
    }
}
