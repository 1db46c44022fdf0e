//! Schema registry

use crate::model::{FieldKind, RecordSchema};
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Registry of record definitions rooted at one top-level record type
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    name: String,
    version: String,
    root: &'static str,
    records: HashMap<&'static str, RecordSchema>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new(name: impl Into<String>, version: impl Into<String>, root: &'static str) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root,
            records: HashMap::new(),
        }
    }

    /// Registry holding the built-in ADF lead definitions
    #[must_use]
    pub fn adf() -> Self {
        crate::adf::registry()
    }

    /// Register a record definition, replacing any previous one of the same name
    pub fn register(&mut self, schema: RecordSchema) {
        if self.records.insert(schema.name, schema).is_some() {
            debug!("Replaced record definition in schema {}", self.name);
        }
    }

    /// Get a record definition by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecordSchema> {
        self.records.get(name)
    }

    /// Get a record definition, failing if it is unknown
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no record of that name is registered.
    pub fn require(&self, name: &str) -> Result<&RecordSchema> {
        self.get(name).ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Check if a record definition exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Schema name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema version
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the top-level record type
    #[must_use]
    pub fn root(&self) -> &'static str {
        self.root
    }

    /// Number of registered record types
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registered record names, sorted
    #[must_use]
    pub fn record_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.records.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Verify the root and every nested-record reference resolve, that each
    /// check fits its field's kind, and that field names and output keys are
    /// unique within each record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a dangling reference and
    /// [`Error::InvalidDefinition`] for misplaced checks or duplicated fields or keys.
    pub fn check_references(&self) -> Result<()> {
        self.require(self.root)?;

        for schema in self.records.values() {
            let mut seen_names = Vec::new();
            let mut seen_keys = Vec::new();
            for field in &schema.fields {
                if let FieldKind::Record(target) = field.kind {
                    if !self.contains(target) {
                        return Err(Error::NotFound(format!(
                            "{target} (referenced by {}.{})",
                            schema.name, field.name
                        )));
                    }
                }
                if let Some(check) = field.checks.iter().find(|c| !c.applies_to(field.kind)) {
                    return Err(Error::invalid_definition(
                        schema.name,
                        format!("check '{check}' cannot apply to field '{}'", field.name),
                    ));
                }
                if seen_names.contains(&field.name) {
                    return Err(Error::invalid_definition(
                        schema.name,
                        format!("duplicate field '{}'", field.name),
                    ));
                }
                if seen_keys.contains(&field.output_key()) {
                    return Err(Error::invalid_definition(
                        schema.name,
                        format!("duplicate output key '{}'", field.output_key()),
                    ));
                }
                seen_names.push(field.name);
                seen_keys.push(field.output_key());
            }
        }

        Ok(())
    }
}
