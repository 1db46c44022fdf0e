//! Error types for the JSON adapter

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when reading or writing JSON
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonError {
    /// Input file does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Input is not valid JSON
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    /// Output could not be produced
    #[error("JSON write error: {0}")]
    Write(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(String),
}

impl JsonError {
    /// Create a not-found error
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a write error
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }

    /// Map an I/O error on `path`, keeping a missing file and non-UTF-8
    /// content distinct
    pub fn from_io(path: impl AsRef<Path>, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(path),
            std::io::ErrorKind::InvalidData => Self::Malformed {
                line: 0,
                column: 0,
                message: format!("invalid UTF-8: {err}"),
            },
            _ => Self::Io(format!("{}: {err}", path.as_ref().display())),
        }
    }

    /// Get the line number if available
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return Self::Io(e.to_string());
        }
        Self::Malformed {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for JsonError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type alias for JSON operations
pub type JsonResult<T> = std::result::Result<T, JsonError>;
