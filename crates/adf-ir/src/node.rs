//! Shape descriptions for raw tree values

use serde_json::Value;
use std::fmt;

/// Structural kind of a raw tree value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Null,
    Boolean,
    Number,
    String,
    Sequence,
    Mapping,
}

impl Shape {
    /// Classify a raw value
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Mapping,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "list",
            Self::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

/// Short human-readable description of a raw value for messages
#[must_use]
pub fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Number(n) => n.to_string(),
        other => Shape::of(other).to_string(),
    }
}
