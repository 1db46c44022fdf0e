//! JSON document loading

use crate::errors::{JsonError, JsonResult};
use adf_ir::{Document, SourceFormat, SourceInfo};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Parse JSON text into a document
///
/// # Errors
///
/// Returns [`JsonError::Malformed`] when the text is not valid JSON.
pub fn parse_document(content: &str) -> JsonResult<Document> {
    let root: Value = serde_json::from_str(content)?;
    Ok(Document::new(root))
}

/// Read a JSON file into a document
///
/// # Errors
///
/// Returns [`JsonError::NotFound`] for a missing file, [`JsonError::Malformed`]
/// for invalid JSON or non-UTF-8 content and [`JsonError::Io`] for other read failures.
pub fn load_document(path: &Path) -> JsonResult<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| JsonError::from_io(path, &e))?;
    let doc = parse_document(&content)?;
    debug!("Loaded JSON document from {}", path.display());

    Ok(doc.with_source(SourceInfo::new(
        path.display().to_string(),
        SourceFormat::Json,
    )))
}
