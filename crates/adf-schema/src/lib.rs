//! # adf-schema
//!
//! Record schema model and the built-in ADF lead definitions.
//!
//! A schema is a set of named record types. Each record type is an ordered list
//! of field specifications (name, source aliases, kind, cardinality, checks)
//! plus record-level rules. The definitions are registered statically through
//! builders; nothing is looked up by reflection at validation time.

pub mod adf;
pub mod model;
pub mod registry;

pub use model::{Cardinality, Check, FieldKind, FieldSpec, RecordRule, RecordSchema};
pub use registry::SchemaRegistry;

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Record type not found: {0}")]
    NotFound(String),

    #[error("Invalid record definition '{record}': {reason}")]
    InvalidDefinition { record: String, reason: String },
}

impl Error {
    /// Build an invalid-definition error
    pub fn invalid_definition(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
