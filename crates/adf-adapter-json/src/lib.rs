//! # adf-adapter-json
//!
//! JSON adapter for loading lead documents and writing raw trees.
//!
//! ## Example Usage
//!
//! ```rust
//! use adf_adapter_json::{JsonWriter, parse_document};
//!
//! let doc = parse_document(r#"{"adf": {"prospect": {"@status": "new"}}}"#).unwrap();
//! let text = JsonWriter::new().pretty(false).to_string(&doc.root).unwrap();
//! assert_eq!(text, r#"{"adf":{"prospect":{"@status":"new"}}}"#);
//! ```

pub mod errors;
pub mod reader;
pub mod writer;

pub use errors::{JsonError, JsonResult};
pub use reader::{load_document, parse_document};
pub use writer::{JsonWriter, WriteOutcome, write_tree};

pub use errors::JsonError as Error;
pub type Result<T> = JsonResult<T>;
