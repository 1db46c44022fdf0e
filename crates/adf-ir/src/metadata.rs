//! Metadata for tracking where a raw tree came from
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent setters are designed for chaining.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Format a raw tree was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Parsed directly from a JSON document
    #[default]
    Json,

    /// Converted from an XML document
    Xml,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

/// Information about the source of the data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source file path or identifier
    pub source: String,

    /// Format the raw tree was produced from
    pub format: SourceFormat,

    /// Additional context (e.g., converter name)
    pub context: Option<String>,
}

/// Severity level for validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl SourceInfo {
    /// Create new source info
    pub fn new(source: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            source: source.into(),
            format,
            context: None,
        }
    }

    /// Add context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_info_creation() {
        let source = SourceInfo::new("lead1.json", SourceFormat::Json);

        assert_eq!(source.source, "lead1.json");
        assert_eq!(source.format, SourceFormat::Json);
        assert!(source.context.is_none());
    }

    #[test]
    fn test_source_info_with_context() {
        let source = SourceInfo::new("lead1.xml", SourceFormat::Xml).with_context("quick-xml");

        assert_eq!(source.format, SourceFormat::Xml);
        assert_eq!(source.context, Some("quick-xml".to_string()));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_source_format_display() {
        assert_eq!(SourceFormat::Json.to_string(), "json");
        assert_eq!(SourceFormat::Xml.to_string(), "xml");
        assert_eq!(SourceFormat::default(), SourceFormat::Json);
    }
}
