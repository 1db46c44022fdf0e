//! Validation reporter

use crate::engine::{ValidationError, ValidationResult};
use crate::rules::Category;
use adf_ir::Severity;
use serde::Serialize;

/// One finding in a serializable report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub category: Category,
    pub path: String,
    pub message: String,
}

impl From<&ValidationError> for ValidationIssue {
    fn from(error: &ValidationError) -> Self {
        Self {
            severity: error.severity,
            code: error.code(),
            category: error.kind.category(),
            path: error.path.to_string(),
            message: error.message.clone(),
        }
    }
}

/// Machine-readable summary of one validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub source: String,
    pub valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub truncated: bool,
    /// Errors first, then warnings
    pub issues: Vec<ValidationIssue>,
}

/// Reports validation results
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationReporter {
    include_warnings: bool,
}

impl ValidationReporter {
    /// Create a reporter that lists errors only
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also list warnings
    #[must_use]
    pub fn with_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }

    /// One line per error (and per warning when enabled)
    #[must_use]
    pub fn render(&self, result: &ValidationResult) -> Vec<String> {
        let mut lines: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        if result.truncated {
            lines.push("... further errors suppressed".to_string());
        }
        if self.include_warnings {
            lines.extend(result.warnings.iter().map(|w| format!("warning: {w}")));
        }
        lines
    }

    /// Short summary line
    #[must_use]
    pub fn summary(&self, source: &str, result: &ValidationResult) -> String {
        if result.is_valid {
            format!(
                "{source}: valid ({} warning{})",
                result.warnings.len(),
                plural(result.warnings.len())
            )
        } else {
            format!(
                "{source}: invalid ({} error{}{})",
                result.errors.len(),
                plural(result.errors.len()),
                if result.truncated { ", truncated" } else { "" }
            )
        }
    }

    /// Build a serializable report
    #[must_use]
    pub fn report(&self, source: &str, result: &ValidationResult) -> ValidationReport {
        let mut issues: Vec<ValidationIssue> = result.errors.iter().map(Into::into).collect();
        if self.include_warnings {
            issues.extend(result.warnings.iter().map(ValidationIssue::from));
        }

        ValidationReport {
            source: source.to_string(),
            valid: result.is_valid,
            error_count: result.errors.len(),
            warning_count: result.warnings.len(),
            truncated: result.truncated,
            issues,
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
