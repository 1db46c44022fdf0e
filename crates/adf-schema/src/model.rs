//! Schema model definitions

use adf_ir::TEXT_KEY;
use std::fmt;

/// Semantic kind of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Nested record of the named type
    Record(&'static str),
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    One,
    /// A single value or a sequence of values
    OneOrMany,
}

/// Field-level check applied to a non-null value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Value must be one of a fixed set of codes (case-sensitive)
    OneOf {
        label: &'static str,
        codes: &'static [&'static str],
    },
    /// Three uppercase letters
    Currency,
    /// Known ISO 3166-1 country identifier
    Country,
    /// ISO 8601 calendar date or date-time
    Date { label: &'static str },
    /// Integer greater than or equal to `min`
    AtLeast { label: &'static str, min: i64 },
    /// Integer strictly between `low` and `high`
    BetweenExclusive {
        label: &'static str,
        low: i64,
        high: i64,
    },
}

impl Check {
    /// True when the check can run on values of `kind`
    #[must_use]
    pub fn applies_to(&self, kind: FieldKind) -> bool {
        match self {
            Self::OneOf { .. } | Self::Currency | Self::Country | Self::Date { .. } => {
                kind == FieldKind::Text
            }
            Self::AtLeast { .. } | Self::BetweenExclusive { .. } => kind == FieldKind::Integer,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneOf { codes, .. } => write!(f, "one of {}", codes.join(", ")),
            Self::Currency => write!(f, "currency code"),
            Self::Country => write!(f, "country"),
            Self::Date { .. } => write!(f, "ISO 8601 date"),
            Self::AtLeast { min, .. } => write!(f, ">= {min}"),
            Self::BetweenExclusive { low, high, .. } => write!(f, "between {low} and {high} (exclusive)"),
        }
    }
}

/// Specification of one field in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Source keys tried before the field name; the first one is the output key
    pub aliases: Vec<&'static str>,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub required: bool,
    /// Checks in the order they are applied
    pub checks: Vec<Check>,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            kind,
            cardinality: Cardinality::One,
            required: false,
            checks: Vec::new(),
        }
    }

    /// Text field
    #[must_use]
    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Integer field
    #[must_use]
    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Nested record field
    #[must_use]
    pub fn record(name: &'static str, record: &'static str) -> Self {
        Self::new(name, FieldKind::Record(record))
    }

    /// Add a source alias
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accept a single value or a sequence
    #[must_use]
    pub fn one_or_many(mut self) -> Self {
        self.cardinality = Cardinality::OneOrMany;
        self
    }

    /// Restrict to a fixed set of codes
    #[must_use]
    pub fn one_of(mut self, label: &'static str, codes: &'static [&'static str]) -> Self {
        self.checks.push(Check::OneOf { label, codes });
        self
    }

    /// Require a currency code
    #[must_use]
    pub fn currency(mut self) -> Self {
        self.checks.push(Check::Currency);
        self
    }

    /// Require a known country
    #[must_use]
    pub fn country(mut self) -> Self {
        self.checks.push(Check::Country);
        self
    }

    /// Require an ISO 8601 date
    #[must_use]
    pub fn date(mut self, label: &'static str) -> Self {
        self.checks.push(Check::Date { label });
        self
    }

    /// Require an integer `>= min`
    #[must_use]
    pub fn at_least(mut self, label: &'static str, min: i64) -> Self {
        self.checks.push(Check::AtLeast { label, min });
        self
    }

    /// Require an integer strictly between `low` and `high`
    #[must_use]
    pub fn between_exclusive(mut self, label: &'static str, low: i64, high: i64) -> Self {
        self.checks.push(Check::BetweenExclusive { label, low, high });
        self
    }

    /// Key the field is written under when flattening
    #[must_use]
    pub fn output_key(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or(self.name)
    }

    /// Keys tried in order when reading a raw mapping
    pub fn lookup_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.aliases.iter().copied().chain(std::iter::once(self.name))
    }

    /// True when the field carries an XML element's text content
    #[must_use]
    pub fn is_text_content(&self) -> bool {
        self.aliases.contains(&TEXT_KEY)
    }
}

/// Record-level rule applied after all fields resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRule {
    /// At least one of the listed fields must be present
    AnyOf {
        fields: &'static [&'static str],
        message: &'static str,
    },
}

/// Definition of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
    pub rules: Vec<RecordRule>,
}

impl RecordSchema {
    /// Create an empty record definition
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a record-level rule
    #[must_use]
    pub fn rule(mut self, rule: RecordRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Required fields in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// The field holding text content, which allows bare-scalar shorthand
    #[must_use]
    pub fn text_content_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.is_text_content())
    }

    /// True when some field reads from `key`
    #[must_use]
    pub fn accepts_key(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.lookup_keys().any(|k| k == key))
    }
}
