#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # adf-validation
//!
//! Validation engine that turns a raw lead tree into a validated record graph.
//!
//! The engine walks the tree against a [`adf_schema::SchemaRegistry`],
//! collecting every violation rather than stopping at the first one. Unknown
//! keys are treated according to the configured strictness level.
//!
//! ## Example Usage
//!
//! ```rust
//! use adf_validation::{StrictnessLevel, ValidationConfig, ValidationEngine};
//! use adf_ir::{Document, FlattenOptions};
//! use serde_json::json;
//!
//! let engine = ValidationEngine::with_config(
//!     ValidationConfig::new().strictness(StrictnessLevel::Strict),
//! );
//!
//! let doc = Document::new(json!({
//!     "adf": {"prospect": {"vehicle": {"year": "2023", "make": "Hyundai", "model": "i30"}}}
//! }));
//!
//! let result = engine.validate(&doc).unwrap();
//! assert!(result.is_valid);
//!
//! let lead = result.record.unwrap();
//! assert_eq!(lead.to_value(&FlattenOptions::default()), doc.root);
//! ```

pub mod codelist;
pub mod engine;
pub mod reporter;
pub mod rules;

pub use codelist::CountryCodeList;
pub use isocountry::CountryCode;
pub use engine::{
    StrictnessLevel, ValidationConfig, ValidationEngine, ValidationError, ValidationResult,
};
pub use reporter::{ValidationIssue, ValidationReport, ValidationReporter};
pub use rules::{
    Category, RuleResult, Violation, ViolationKind, parse_iso8601, validate_at_least,
    validate_between_exclusive, validate_code_list, validate_country, validate_currency,
    validate_date,
};

use thiserror::Error;

/// Errors that stop a validation pass from running
///
/// Violations found in the document are not errors here; they are collected
/// in [`ValidationResult`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Schema error: {0}")]
    Schema(#[from] adf_schema::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to validate a document with default settings
///
/// # Errors
///
/// Returns an error when validation execution fails.
pub fn validate(doc: &adf_ir::Document) -> Result<ValidationResult> {
    let engine = ValidationEngine::new();
    engine.validate(doc)
}

/// Validate a document and return the record graph, failing on any violation
///
/// # Errors
///
/// Returns [`Error::Validation`] carrying every violation, one per line.
pub fn validate_strict(doc: &adf_ir::Document) -> Result<adf_ir::Record> {
    validate(doc)?
        .into_outcome()
        .map_err(|errors| {
            Error::Validation(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        })
}
