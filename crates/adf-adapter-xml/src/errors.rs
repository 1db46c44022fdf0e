//! Error types for the XML adapter

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading XML
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// Input file does not exist
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Input is not well-formed XML
    #[error("XML parse error at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// I/O error
    #[error("IO error: {0}")]
    Io(String),
}

impl XmlError {
    /// Create a not-found error
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a parse error at a byte offset
    pub fn malformed(position: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            message: message.into(),
        }
    }

    /// Map an I/O error on `path`, keeping a missing file and non-UTF-8
    /// content distinct
    pub fn from_io(path: impl AsRef<Path>, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(path),
            std::io::ErrorKind::InvalidData => Self::malformed(0, format!("invalid UTF-8: {err}")),
            _ => Self::Io(format!("{}: {err}", path.as_ref().display())),
        }
    }
}

impl From<std::io::Error> for XmlError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Result type alias for XML operations
pub type XmlResult<T> = std::result::Result<T, XmlError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_malformed_display() {
        let err = XmlError::malformed(42, "unexpected end tag");
        assert_eq!(err.to_string(), "XML parse error at byte 42: unexpected end tag");
    }

    #[test]
    fn test_from_io_not_found() {
        let err = XmlError::from_io("lead.xml", &io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err, XmlError::not_found("lead.xml"));
        assert_eq!(err.to_string(), "File not found: lead.xml");
    }

    #[test]
    fn test_from_io_invalid_data_is_malformed() {
        let err = XmlError::from_io(
            "lead.xml",
            &io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        );
        assert!(matches!(err, XmlError::Malformed { position: 0, .. }));
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn test_from_io_other() {
        let err = XmlError::from_io(
            "lead.xml",
            &io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, XmlError::Io(ref m) if m.contains("lead.xml")));
    }
}
