#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # adf-ir
//!
//! Intermediate representation for ADF lead documents.
//!
//! This crate holds both ends of a validation pass: the loosely-typed raw tree
//! (a `serde_json::Value` as produced by parsing JSON or converting XML) and the
//! validated record graph that the validation engine builds from it. The record
//! graph can be flattened back into a raw tree for re-serialization.

/// Document container wrapping a raw tree plus source metadata.
pub mod document;
/// Source information and severity levels.
pub mod metadata;
/// Shape descriptions for raw tree values.
pub mod node;
/// Dotted field paths used to attribute validation messages.
pub mod path;
/// Validated record graph and its re-flattening.
pub mod record;

/// Primary IR document type.
pub use document::{Document, DocumentMetadata};
/// Source metadata and message severity.
pub use metadata::{Severity, SourceFormat, SourceInfo};
/// Raw value shape helpers.
pub use node::{Shape, describe};
/// Field path primitives.
pub use path::{FieldPath, Segment};
/// Record graph primitives and flattening options.
pub use record::{Field, FieldValue, FlattenOptions, KeyStyle, NullPolicy, Record};

/// Key prefix marking an XML attribute in a raw tree.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Reserved key holding an XML element's text content in a raw tree.
pub const TEXT_KEY: &str = "#text";
