//! JSON tree writer

use crate::errors::{JsonError, JsonResult};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What [`JsonWriter::write_file`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File written
    Written { path: PathBuf, bytes: usize },
    /// Nothing written because the tree was empty
    SkippedEmpty,
}

/// Writer for JSON trees
#[derive(Debug, Clone, Copy)]
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    /// Create a writer producing indented output
    #[must_use]
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Choose indented or compact output
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Render a tree as text
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Write`] if serialization fails.
    pub fn to_string(&self, tree: &Value) -> JsonResult<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(tree)
        } else {
            serde_json::to_string(tree)
        };
        text.map_err(|e| JsonError::write(e.to_string()))
    }

    /// Write a tree followed by a newline
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Write`] or [`JsonError::Io`] on failure.
    pub fn write<W: Write>(&self, mut writer: W, tree: &Value) -> JsonResult<()> {
        let text = self.to_string(tree)?;
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write a tree to `path`; an empty tree (null or empty mapping) is skipped
    ///
    /// # Errors
    ///
    /// Returns [`JsonError::Write`] or [`JsonError::Io`] on failure.
    pub fn write_file(&self, tree: &Value, path: &Path) -> JsonResult<WriteOutcome> {
        if is_empty_tree(tree) {
            warn!("Cannot create JSON output {}: tree is empty", path.display());
            return Ok(WriteOutcome::SkippedEmpty);
        }

        let mut text = self.to_string(tree)?;
        text.push('\n');
        std::fs::write(path, &text).map_err(|e| JsonError::from_io(path, &e))?;
        debug!(bytes = text.len(), "Wrote JSON to {}", path.display());

        Ok(WriteOutcome::Written {
            path: path.to_path_buf(),
            bytes: text.len(),
        })
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_empty_tree(tree: &Value) -> bool {
    match tree {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Write a tree to `path` as indented JSON
///
/// # Errors
///
/// Returns [`JsonError::Write`] or [`JsonError::Io`] on failure.
pub fn write_tree(tree: &Value, path: &Path) -> JsonResult<WriteOutcome> {
    JsonWriter::new().write_file(tree, path)
}
