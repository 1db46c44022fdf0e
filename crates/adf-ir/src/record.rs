//! Validated record graph
//!
//! A [`Record`] is an instance of one schema record type whose fields have all
//! passed validation. Each field remembers the key it is written under when
//! the graph is flattened back into a raw tree, so no schema lookup is needed
//! for re-serialization.

use crate::TEXT_KEY;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// How absent optional fields are written when flattening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Leave absent fields out of the output
    #[default]
    Omit,
    /// Write absent fields as explicit `null`
    Emit,
}

/// Which name a field is written under when flattening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// Primary source alias (`@status`, `#text`, `requestdate`), reproducing the input tree
    #[default]
    Alias,
    /// Semantic field name (`status`, `name`, `request_date`)
    FieldName,
}

/// Options controlling [`Record::to_value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlattenOptions {
    pub null_policy: NullPolicy,
    pub key_style: KeyStyle,
}

impl FlattenOptions {
    /// Default options: omit nulls, alias keys
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the null policy
    #[must_use]
    pub fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Set the key style
    #[must_use]
    pub fn key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }
}

/// A validated field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent or explicit null
    Null,
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Single nested record
    Record(Record),
    /// Sequence of nested records, kept when the source supplied a sequence
    List(Vec<Record>),
}

impl FieldValue {
    /// True for [`FieldValue::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn to_value(&self, options: &FlattenOptions) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Record(r) => r.to_value(options),
            Self::List(items) => Value::Array(items.iter().map(|r| r.to_value(options)).collect()),
        }
    }
}

/// A named field inside a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Semantic field name
    pub name: &'static str,
    /// Key used when flattening with [`KeyStyle::Alias`]
    pub key: &'static str,
    /// Validated value
    pub value: FieldValue,
}

/// An instance of a schema record type
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: &'static str,
    fields: Vec<Field>,
    shorthand: bool,
}

impl Record {
    /// Create an empty record of the given type
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            fields: Vec::new(),
            shorthand: false,
        }
    }

    /// Mark the record as supplied in bare text-content form
    #[must_use]
    pub fn shorthand(mut self) -> Self {
        self.shorthand = true;
        self
    }

    /// Append a field
    pub fn push(&mut self, name: &'static str, key: &'static str, value: FieldValue) {
        self.fields.push(Field { name, key, value });
    }

    /// Record type name, e.g. `Vehicle`
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// True when the record was given as a bare scalar in the source tree
    #[must_use]
    pub fn is_shorthand(&self) -> bool {
        self.shorthand
    }

    /// All fields in schema order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field value by semantic name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Text value of a field
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value of a field
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Nested record held singly in a field
    #[must_use]
    pub fn record(&self, name: &str) -> Option<&Record> {
        match self.get(name)? {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Nested records in a field regardless of single or list form
    #[must_use]
    pub fn records(&self, name: &str) -> Vec<&Record> {
        match self.get(name) {
            Some(FieldValue::Record(r)) => vec![r],
            Some(FieldValue::List(items)) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Flatten the record back into a raw tree
    #[must_use]
    pub fn to_value(&self, options: &FlattenOptions) -> Value {
        if self.shorthand && options.key_style == KeyStyle::Alias {
            if let Some(content) = self.fields.iter().find(|f| f.key == TEXT_KEY) {
                return content.value.to_value(options);
            }
        }

        let mut map = Map::new();
        for field in &self.fields {
            if field.value.is_null() && options.null_policy == NullPolicy::Omit {
                continue;
            }
            let key = match options.key_style {
                KeyStyle::Alias => field.key,
                KeyStyle::FieldName => field.name,
            };
            map.insert(key.to_string(), field.value.to_value(options));
        }
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value(&FlattenOptions::default()).serialize(serializer)
    }
}
