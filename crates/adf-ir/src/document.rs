//! Document representation for raw lead trees
#![allow(clippy::must_use_candidate)] // Builder/constructor API intentionally omits pervasive #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use crate::metadata::SourceInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw lead document awaiting validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Root of the raw tree
    pub root: Value,

    /// Document-level metadata
    pub metadata: DocumentMetadata,
}

/// Metadata associated with a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Source information (file, format)
    pub source: Option<SourceInfo>,

    /// When the raw tree was loaded
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Document {
    /// Create a new document around a raw tree
    pub fn new(root: Value) -> Self {
        Self {
            root,
            metadata: DocumentMetadata::default(),
        }
    }

    /// Attach source information and stamp the load time
    pub fn with_source(mut self, source: SourceInfo) -> Self {
        tracing::trace!(source = %source.source, format = %source.format, "document source attached");
        self.metadata.source = Some(source);
        self.metadata.loaded_at = Some(chrono::Utc::now());
        self
    }

    /// Source identifier, or `<memory>` when the tree was built in process
    pub fn source_name(&self) -> &str {
        self.metadata
            .source
            .as_ref()
            .map_or("<memory>", |s| s.source.as_str())
    }

    /// True when the tree carries no data (null or an empty mapping)
    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SourceFormat;
    use serde_json::json;

    #[test]
    fn test_document_creation() {
        let doc = Document::new(json!({"adf": {}}));

        assert!(doc.root.get("adf").is_some());
        assert!(doc.metadata.source.is_none());
        assert_eq!(doc.source_name(), "<memory>");
    }

    #[test]
    fn test_document_with_source() {
        let doc = Document::new(json!({"adf": null}))
            .with_source(SourceInfo::new("lead1.json", SourceFormat::Json));

        assert_eq!(doc.source_name(), "lead1.json");
        assert!(doc.metadata.loaded_at.is_some());
    }

    #[test]
    fn test_document_emptiness() {
        assert!(Document::new(Value::Null).is_empty());
        assert!(Document::new(json!({})).is_empty());
        assert!(!Document::new(json!({"adf": {}})).is_empty());
        assert!(!Document::from(json!("text")).is_empty());
    }
}
