//! # adf-adapter-xml
//!
//! XML adapter that turns ADF lead documents into raw trees.
//!
//! Conversion follows the common attribute-prefix convention so that the
//! result validates exactly like a hand-written JSON lead:
//!
//! ```rust
//! use adf_adapter_xml::xml_to_tree;
//! use serde_json::json;
//!
//! let tree = xml_to_tree(r#"<adf><prospect status="new"><requestdate>2024-01-15</requestdate></prospect></adf>"#)
//!     .unwrap();
//! assert_eq!(tree, json!({"adf": {"prospect": {"@status": "new", "requestdate": "2024-01-15"}}}));
//! ```

pub mod errors;
pub mod reader;

pub use errors::{XmlError, XmlResult};
pub use reader::{json_path_for, load_document, xml_to_tree};

pub use errors::XmlError as Error;
pub type Result<T> = XmlResult<T>;
