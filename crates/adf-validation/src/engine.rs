//! Validation engine

use crate::codelist::CountryCodeList;
use crate::rules::{
    Violation, ViolationKind, apply_integer_check, apply_text_check, coerce_integer, coerce_text,
};
use adf_ir::{Document, FieldPath, FieldValue, Record, Severity, Shape, TEXT_KEY};
use adf_schema::{Cardinality, FieldKind, FieldSpec, RecordRule, RecordSchema, SchemaRegistry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// How keys that the schema does not declare are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictnessLevel {
    /// Unknown keys are errors
    Strict,
    /// Unknown keys are warnings
    #[default]
    Moderate,
    /// Unknown keys are ignored
    Lenient,
}

impl fmt::Display for StrictnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Moderate => write!(f, "moderate"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for StrictnessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "moderate" => Ok(Self::Moderate),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown strictness level '{other}'")),
        }
    }
}

/// Validation configuration
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Strictness level
    pub strictness: StrictnessLevel,
    /// Maximum errors recorded before the rest are dropped (0 = unlimited)
    pub max_errors: usize,
}

impl ValidationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strictness level
    #[must_use]
    pub fn strictness(mut self, strictness: StrictnessLevel) -> Self {
        self.strictness = strictness;
        self
    }

    /// Set the error cap
    #[must_use]
    pub fn max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Human-readable message
    pub message: String,
    /// Location of the offending value
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub severity: Severity,
}

impl ValidationError {
    /// Machine-readable code of the violation kind
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,
    /// Validated record graph, present only when there are no errors
    pub record: Option<Record>,
    /// Errors in document order
    pub errors: Vec<ValidationError>,
    /// Warnings in document order
    pub warnings: Vec<ValidationError>,
    /// True when errors were dropped because of `max_errors`
    pub truncated: bool,
}

impl ValidationResult {
    /// Check if there are any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Rendered error lines, one per error
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Either the validated record graph or every error found
    ///
    /// # Errors
    ///
    /// Returns the collected errors when validation failed.
    pub fn into_outcome(self) -> Result<Record, Vec<ValidationError>> {
        match self.record {
            Some(record) if self.is_valid => Ok(record),
            _ => Err(self.errors),
        }
    }
}

/// Accumulates findings during one pass
struct ValidationContext<'a> {
    config: &'a ValidationConfig,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
    truncated: bool,
}

impl<'a> ValidationContext<'a> {
    fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            errors: Vec::new(),
            warnings: Vec::new(),
            truncated: false,
        }
    }

    fn add_error(&mut self, path: &FieldPath, violation: Violation) {
        if self.config.max_errors > 0 && self.errors.len() >= self.config.max_errors {
            self.truncated = true;
            return;
        }
        self.errors.push(ValidationError {
            message: violation.message,
            path: path.clone(),
            kind: violation.kind,
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &FieldPath, violation: Violation) {
        self.warnings.push(ValidationError {
            message: violation.message,
            path: path.clone(),
            kind: violation.kind,
            severity: Severity::Warning,
        });
    }

    fn failed(&self) -> bool {
        self.truncated || !self.errors.is_empty()
    }
}

/// Main validation engine
///
/// Holds an immutable schema registry and country list; one engine can
/// validate any number of documents.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: ValidationConfig,
    registry: SchemaRegistry,
    countries: CountryCodeList,
}

impl ValidationEngine {
    /// Create an engine for the built-in ADF schema
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create an engine for the built-in ADF schema with specific configuration
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            registry: SchemaRegistry::adf(),
            countries: CountryCodeList::iso3166(),
        }
    }

    /// Create an engine for a custom schema
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] when the registry has dangling
    /// references or malformed definitions.
    pub fn with_registry(registry: SchemaRegistry, config: ValidationConfig) -> crate::Result<Self> {
        registry.check_references()?;
        debug!(
            "Loaded schema {} {} with {} record types",
            registry.name(),
            registry.version(),
            registry.len()
        );
        Ok(Self {
            config,
            registry,
            countries: CountryCodeList::iso3166(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate a complete document against the root record type
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] when the schema references an unknown record type.
    pub fn validate(&self, doc: &Document) -> crate::Result<ValidationResult> {
        debug!("Validating {}", doc.source_name());
        self.validate_record(self.registry.root(), &doc.root)
    }

    /// Validate a raw tree against the root record type
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] when the schema references an unknown record type.
    pub fn validate_value(&self, raw: &Value) -> crate::Result<ValidationResult> {
        self.validate_record(self.registry.root(), raw)
    }

    /// Validate a raw tree against a named record type
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Schema`] when `name` or a nested record type is unknown.
    pub fn validate_record(&self, name: &str, raw: &Value) -> crate::Result<ValidationResult> {
        let schema = self.registry.require(name)?;
        let mut ctx = ValidationContext::new(&self.config);
        let record = self.visit_record(schema, raw, &FieldPath::root(), &mut ctx)?;

        let is_valid = !ctx.failed();
        debug!(
            "Validated {}: {} errors, {} warnings",
            name,
            ctx.errors.len(),
            ctx.warnings.len()
        );

        Ok(ValidationResult {
            is_valid,
            record: if is_valid { record } else { None },
            errors: ctx.errors,
            warnings: ctx.warnings,
            truncated: ctx.truncated,
        })
    }

    fn visit_record(
        &self,
        schema: &RecordSchema,
        raw: &Value,
        path: &FieldPath,
        ctx: &mut ValidationContext<'_>,
    ) -> crate::Result<Option<Record>> {
        match raw {
            Value::Object(map) => self.visit_mapping(schema, map, path, ctx).map(Some),
            Value::String(_) | Value::Number(_) if schema.text_content_field().is_some() => {
                trace!("{path}: {} given as bare scalar", schema.name);
                let mut map = Map::new();
                map.insert(TEXT_KEY.to_string(), raw.clone());
                let record = self.visit_mapping(schema, &map, path, ctx)?;
                Ok(Some(record.shorthand()))
            }
            other => {
                ctx.add_error(
                    path,
                    Violation::new(
                        ViolationKind::WrongShape,
                        format!("Expected a {} mapping, got {}", schema.name, Shape::of(other)),
                    ),
                );
                Ok(None)
            }
        }
    }

    fn visit_mapping(
        &self,
        schema: &RecordSchema,
        map: &Map<String, Value>,
        path: &FieldPath,
        ctx: &mut ValidationContext<'_>,
    ) -> crate::Result<Record> {
        let mut record = Record::new(schema.name);
        let mut missing = Vec::new();

        for field in &schema.fields {
            let raw = lookup(map, field);
            self.check_shadowed_aliases(schema, field, map, path, ctx);
            if raw.is_null() && field.required {
                missing.push(field.name);
            }
            let value = self.resolve_field(field, raw, &path.child(field.name), ctx)?;
            record.push(field.name, field.output_key(), value);
        }

        if !missing.is_empty() {
            ctx.add_error(
                path,
                Violation::new(
                    ViolationKind::MissingRequired,
                    format!(
                        "The following required fields in {} are missing: {}",
                        schema.name,
                        missing.join(", ")
                    ),
                ),
            );
        }

        for rule in &schema.rules {
            match rule {
                RecordRule::AnyOf { fields, message } => {
                    let present = fields.iter().any(|name| {
                        schema
                            .get(name)
                            .is_some_and(|field| !lookup(map, field).is_null())
                    });
                    if !present {
                        ctx.add_error(
                            path,
                            Violation::new(ViolationKind::MissingRequired, *message),
                        );
                    }
                }
            }
        }

        self.check_unknown_keys(schema, map, path, ctx);

        Ok(record)
    }

    fn resolve_field(
        &self,
        field: &FieldSpec,
        raw: &Value,
        path: &FieldPath,
        ctx: &mut ValidationContext<'_>,
    ) -> crate::Result<FieldValue> {
        if raw.is_null() {
            return Ok(FieldValue::Null);
        }

        let target = match field.kind {
            FieldKind::Record(target) => target,
            FieldKind::Text | FieldKind::Integer => {
                return Ok(self.resolve_scalar(field, raw, path, ctx));
            }
        };
        let schema = self.registry.require(target)?;

        match raw {
            Value::Array(items) if field.cardinality == Cardinality::OneOrMany => {
                let mut records = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    if let Some(record) = self.visit_record(schema, item, &path.index(idx), ctx)? {
                        records.push(record);
                    }
                }
                Ok(FieldValue::List(records))
            }
            Value::Array(_) => {
                ctx.add_error(
                    path,
                    Violation::new(
                        ViolationKind::WrongShape,
                        format!("Expected a single {target}, got a list"),
                    ),
                );
                Ok(FieldValue::Null)
            }
            _ => Ok(self
                .visit_record(schema, raw, path, ctx)?
                .map_or(FieldValue::Null, FieldValue::Record)),
        }
    }

    fn resolve_scalar(
        &self,
        field: &FieldSpec,
        raw: &Value,
        path: &FieldPath,
        ctx: &mut ValidationContext<'_>,
    ) -> FieldValue {
        let resolved = match field.kind {
            FieldKind::Integer => coerce_integer(raw, field.name).and_then(|value| {
                for check in &field.checks {
                    apply_integer_check(check, value).into_result()?;
                }
                Ok(FieldValue::Integer(value))
            }),
            _ => coerce_text(raw, field.name).and_then(|value| {
                for check in &field.checks {
                    apply_text_check(check, &value, &self.countries).into_result()?;
                }
                Ok(FieldValue::Text(value))
            }),
        };

        resolved.unwrap_or_else(|violation| {
            ctx.add_error(path, violation);
            FieldValue::Null
        })
    }

    /// Report keys of a field that lost to an earlier non-null alias
    fn check_shadowed_aliases(
        &self,
        schema: &RecordSchema,
        field: &FieldSpec,
        map: &Map<String, Value>,
        path: &FieldPath,
        ctx: &mut ValidationContext<'_>,
    ) {
        let mut given = field
            .lookup_keys()
            .filter(|key| map.get(*key).is_some_and(|value| !value.is_null()));
        let Some(used) = given.next() else {
            return;
        };

        for ignored in given.filter(|key| *key != used) {
            let violation = Violation::new(
                ViolationKind::DuplicateField,
                format!(
                    "Field '{ignored}' in {} ignored: {} is already given as '{used}'",
                    schema.name, field.name
                ),
            );
            let key_path = path.child(ignored);
            match self.config.strictness {
                StrictnessLevel::Strict => ctx.add_error(&key_path, violation),
                StrictnessLevel::Moderate | StrictnessLevel::Lenient => {
                    ctx.add_warning(&key_path, violation);
                }
            }
        }
    }

    fn check_unknown_keys(
        &self,
        schema: &RecordSchema,
        map: &Map<String, Value>,
        path: &FieldPath,
        ctx: &mut ValidationContext<'_>,
    ) {
        if self.config.strictness == StrictnessLevel::Lenient {
            return;
        }

        for key in map.keys() {
            if schema.accepts_key(key) || is_markup_key(key) {
                continue;
            }
            let violation = Violation::new(
                ViolationKind::UnknownField,
                format!("Unknown field '{key}' in {}", schema.name),
            );
            let key_path = path.child(key);
            match self.config.strictness {
                StrictnessLevel::Strict => ctx.add_error(&key_path, violation),
                StrictnessLevel::Moderate => ctx.add_warning(&key_path, violation),
                StrictnessLevel::Lenient => {}
            }
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

static NULL: Value = Value::Null;

/// First non-null value under the field's aliases, then its plain name
fn lookup<'v>(map: &'v Map<String, Value>, field: &FieldSpec) -> &'v Value {
    field
        .lookup_keys()
        .filter_map(|key| map.get(key))
        .find(|value| !value.is_null())
        .unwrap_or(&NULL)
}

/// XML namespace declarations and the prolog, which never count as data
fn is_markup_key(key: &str) -> bool {
    key == "?xml" || key == "@xmlns" || key.starts_with("@xmlns:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_lead() -> Value {
        json!({
            "adf": {
                "prospect": {
                    "vehicle": {"year": "2023", "make": "Hyundai", "model": "i30"},
                    "customer": {"contact": {"name": "John B"}}
                }
            }
        })
    }

    #[test]
    fn test_validate_document() {
        let engine = ValidationEngine::new();
        let result = engine.validate(&Document::new(valid_lead())).unwrap();

        assert!(result.is_valid);
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
        let lead = result.record.unwrap();
        assert_eq!(lead.kind(), "Lead");
    }

    #[test]
    fn test_missing_required_reports_once_per_record() {
        let engine = ValidationEngine::new();
        let result = engine
            .validate_value(&json!({"adf": {"prospect": {"vehicle": {"year": "2023"}}}}))
            .unwrap();

        assert!(!result.is_valid);
        assert!(result.record.is_none());
        assert_eq!(result.errors.len(), 1);
        let error = &result.errors[0];
        assert_eq!(error.kind, ViolationKind::MissingRequired);
        assert_eq!(error.path.to_string(), "adf.prospect.vehicle");
        assert_eq!(
            error.message,
            "The following required fields in Vehicle are missing: make, model"
        );
    }

    #[test]
    fn test_malformed_required_value_not_reported_missing() {
        let engine = ValidationEngine::new();
        let result = engine
            .validate_record(
                "Vehicle",
                &json!({"year": "2023", "make": "Kia", "model": {"x": 1}}),
            )
            .unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ViolationKind::WrongShape);
        assert_eq!(result.errors[0].path.to_string(), "model");
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let engine = ValidationEngine::new();
        let result = engine
            .validate_record(
                "Price",
                &json!({"@type": "bargain", "@currency": "us", "@delta": "relative", "#text": "x"}),
            )
            .unwrap();

        let kinds: Vec<_> = result.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::InvalidCode,
                ViolationKind::InvalidCurrency,
                ViolationKind::InvalidInteger,
            ]
        );
    }

    #[test]
    fn test_shorthand_record() {
        let engine = ValidationEngine::new();
        let result = engine.validate_record("Odometer", &json!("90000")).unwrap();

        let odometer = result.record.unwrap();
        assert!(odometer.is_shorthand());
        assert_eq!(odometer.integer("odometer"), Some(90_000));
    }

    #[test]
    fn test_scalar_for_record_without_text_content() {
        let engine = ValidationEngine::new();
        let result = engine.validate_record("Vehicle", &json!("Hyundai")).unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Expected a Vehicle mapping, got string");
    }

    #[test]
    fn test_list_for_single_record() {
        let engine = ValidationEngine::new();
        let result = engine
            .validate_record(
                "Vehicle",
                &json!({"year": "2023", "make": "Kia", "model": "Rio", "price": [1, 2]}),
            )
            .unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Expected a single Price, got a list");
        assert_eq!(result.errors[0].path.to_string(), "price");
    }

    #[test]
    fn test_list_preserved_for_one_or_many() {
        let engine = ValidationEngine::new();
        let result = engine
            .validate_record("Contact", &json!({"name": [{"@part": "first", "#text": "John"}, "Doe"]}))
            .unwrap();

        let contact = result.record.unwrap();
        assert!(matches!(contact.get("name"), Some(FieldValue::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_any_of_rule() {
        let engine = ValidationEngine::new();

        let result = engine
            .validate_record("TimeFrame", &json!({"description": "soon"}))
            .unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "At least one of 'earliest_date' or 'latest_date' must be provided."
        );

        let result = engine
            .validate_record("TimeFrame", &json!({"latestdate": "2024-06-01"}))
            .unwrap();
        assert!(result.is_valid);
    }

    #[test]
    fn test_any_of_rule_with_malformed_date() {
        let engine = ValidationEngine::new();
        let result = engine
            .validate_record("TimeFrame", &json!({"earliestdate": "someday"}))
            .unwrap();

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ViolationKind::InvalidDate);
    }

    #[test]
    fn test_strictness_levels() {
        let raw = json!({"year": "2023", "make": "Kia", "model": "Rio", "colour": "red"});

        let strict = ValidationEngine::with_config(
            ValidationConfig::new().strictness(StrictnessLevel::Strict),
        );
        let result = strict.validate_record("Vehicle", &raw).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].kind, ViolationKind::UnknownField);
        assert_eq!(result.errors[0].to_string(), "colour: Unknown field 'colour' in Vehicle");

        let moderate = ValidationEngine::new();
        let result = moderate.validate_record("Vehicle", &raw).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, Severity::Warning);

        let lenient = ValidationEngine::with_config(
            ValidationConfig::new().strictness(StrictnessLevel::Lenient),
        );
        let result = lenient.validate_record("Vehicle", &raw).unwrap();
        assert!(result.is_valid);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_second_alias_of_a_field_is_reported() {
        let raw = json!({"@currency": "USD", "@curreny": "usd", "#text": 1});

        let result = ValidationEngine::new().validate_record("Price", &raw).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        let warning = &result.warnings[0];
        assert_eq!(warning.kind, ViolationKind::DuplicateField);
        assert_eq!(
            warning.to_string(),
            "@curreny: Field '@curreny' in Price ignored: currency is already given as '@currency'"
        );

        let strict = ValidationEngine::with_config(
            ValidationConfig::new().strictness(StrictnessLevel::Strict),
        );
        let result = strict.validate_record("Price", &raw).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code(), "DUPLICATE_FIELD");

        let lenient = ValidationEngine::with_config(
            ValidationConfig::new().strictness(StrictnessLevel::Lenient),
        );
        let result = lenient.validate_record("Price", &raw).unwrap();
        assert_eq!(result.warnings.len(), 1);

        let null_second = json!({"@currency": "USD", "@curreny": null, "#text": 1});
        let result = ValidationEngine::new().validate_record("Price", &null_second).unwrap();
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_markup_keys_ignored() {
        let engine = ValidationEngine::with_config(
            ValidationConfig::new().strictness(StrictnessLevel::Strict),
        );
        let result = engine
            .validate_value(&json!({
                "?xml": {"@version": "1.0"},
                "adf": {"@xmlns": "urn:adf", "@xmlns:x": "urn:x", "prospect": null}
            }))
            .unwrap();

        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_max_errors() {
        let raw = json!({"@type": "bargain", "@currency": "us", "@delta": "up"});
        let engine = ValidationEngine::with_config(ValidationConfig::new().max_errors(2));
        let result = engine.validate_record("Price", &raw).unwrap();

        assert!(!result.is_valid);
        assert!(result.truncated);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_unknown_record_type() {
        let engine = ValidationEngine::new();
        assert!(engine.validate_record("Spaceship", &json!({})).is_err());
    }

    #[test]
    fn test_into_outcome() {
        let engine = ValidationEngine::new();
        let ok = engine.validate_value(&valid_lead()).unwrap().into_outcome();
        assert!(ok.is_ok());

        let err = engine
            .validate_value(&json!({"adf": {"prospect": {"vendor": {}}}}))
            .unwrap()
            .into_outcome()
            .unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("vendorname"));
    }

    #[test]
    fn test_strictness_from_str() {
        assert_eq!("STRICT".parse::<StrictnessLevel>(), Ok(StrictnessLevel::Strict));
        assert!("loose".parse::<StrictnessLevel>().is_err());
        assert_eq!(StrictnessLevel::default().to_string(), "moderate");
    }
}
