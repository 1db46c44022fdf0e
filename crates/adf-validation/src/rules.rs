//! Validation rules

use crate::codelist::CountryCodeList;
use adf_ir::{Shape, describe};
use adf_schema::Check;
use chrono::{NaiveDate, NaiveTime, Weekday};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static CURRENCY_CODE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").ok());

static CLOCK_TIME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})(?::?(\d{2})(?::?(\d{2})(?:[.,]\d{1,9})?)?)?$").ok()
});

static UTC_OFFSET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]\d{2}(?::?\d{2}(?::?\d{2}(?:\.\d{1,6})?)?)?$").ok());

/// Exclusive upper bound of `i64` as a float (2^63)
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Broad class of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Missing required data or a value of the wrong shape
    Structural,
    /// Value present but not in the expected format or code set
    Format,
    /// Numeric value outside its allowed range
    Range,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Format => write!(f, "format"),
            Self::Range => write!(f, "range"),
        }
    }
}

/// What went wrong with a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    MissingRequired,
    WrongShape,
    InvalidCode,
    InvalidCurrency,
    InvalidCountry,
    InvalidDate,
    InvalidInteger,
    OutOfRange,
    UnknownField,
    DuplicateField,
}

impl ViolationKind {
    /// Category the kind belongs to
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            Self::MissingRequired
            | Self::WrongShape
            | Self::UnknownField
            | Self::DuplicateField => Category::Structural,
            Self::InvalidCode
            | Self::InvalidCurrency
            | Self::InvalidCountry
            | Self::InvalidDate
            | Self::InvalidInteger => Category::Format,
            Self::OutOfRange => Category::Range,
        }
    }

    /// Stable machine-readable code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingRequired => "MISSING_REQUIRED",
            Self::WrongShape => "WRONG_SHAPE",
            Self::InvalidCode => "INVALID_CODE",
            Self::InvalidCurrency => "INVALID_CURRENCY",
            Self::InvalidCountry => "INVALID_COUNTRY",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidInteger => "INVALID_INTEGER",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::UnknownField => "UNKNOWN_FIELD",
            Self::DuplicateField => "DUPLICATE_FIELD",
        }
    }
}

/// A failed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validation rule result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub is_valid: bool,
    pub violation: Option<Violation>,
}

impl RuleResult {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            violation: None,
        }
    }

    pub fn invalid(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            violation: Some(Violation::new(kind, message)),
        }
    }

    /// Convert into a `Result`, keeping the violation
    ///
    /// # Errors
    ///
    /// Returns the violation when the rule failed.
    pub fn into_result(self) -> Result<(), Violation> {
        match self.violation {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}

/// Validate a value against a code list (case-sensitive)
#[must_use]
pub fn validate_code_list(value: &str, label: &str, codes: &[&str]) -> RuleResult {
    if codes.contains(&value) {
        RuleResult::valid()
    } else {
        RuleResult::invalid(
            ViolationKind::InvalidCode,
            format!(
                "Invalid {label} input: '{value}' is not one of {}",
                codes.join(", ")
            ),
        )
    }
}

/// Validate a three-letter uppercase currency code
#[must_use]
pub fn validate_currency(value: &str) -> RuleResult {
    if CURRENCY_CODE.as_ref().is_some_and(|re| re.is_match(value)) {
        RuleResult::valid()
    } else {
        RuleResult::invalid(
            ViolationKind::InvalidCurrency,
            format!("Invalid Currency input: '{value}' is not a three-letter uppercase currency code"),
        )
    }
}

/// Validate a country identifier against a code list
#[must_use]
pub fn validate_country(value: &str, countries: &CountryCodeList) -> RuleResult {
    if countries.is_valid(value) {
        RuleResult::valid()
    } else {
        RuleResult::invalid(
            ViolationKind::InvalidCountry,
            format!("Invalid Country input: '{value}' is not a known ISO 3166-1 country"),
        )
    }
}

/// Parse an ISO 8601 date or date-time, returning its date part
///
/// The date may be a calendar date (`2024-01-15`, `20240115`), a week date
/// (`2024-W03-1`, `2024W031`, `2024-W03`) or an ordinal date (`2024-015`,
/// `2024015`). A time may follow after `T` or a space, from `HH` up to
/// `HH:MM:SS.ffffff` in extended or basic form, with an optional `Z` or
/// `±HH[:MM]` offset.
#[must_use]
pub fn parse_iso8601(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let (date, time) = match value.find(['T', ' ']) {
        Some(idx) => (&value[..idx], Some(&value[idx + 1..])),
        None => (value, None),
    };

    let date = parse_date_part(date)?;
    match time {
        Some(time) if !is_time_part(time) => None,
        _ => Some(date),
    }
}

fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_date_part(date: &str) -> Option<NaiveDate> {
    if !date.is_ascii() {
        return None;
    }
    let year = i32::try_from(digits(date.get(..4)?)?).ok()?;
    let rest = &date[4..];
    let extended = rest.starts_with('-');
    let body = rest.strip_prefix('-').unwrap_or(rest);

    if let Some(week) = body.strip_prefix('W') {
        let (week, day) = match (extended, week.len()) {
            (_, 2) => (week, "1"),
            (true, 4) => {
                let (week, day) = week.split_at(2);
                (week, day.strip_prefix('-')?)
            }
            (false, 3) => week.split_at(2),
            _ => return None,
        };
        let weekday = match digits(day)? {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            7 => Weekday::Sun,
            _ => return None,
        };
        return NaiveDate::from_isoywd_opt(year, digits(week)?, weekday);
    }

    match (extended, body.len()) {
        (_, 3) => NaiveDate::from_yo_opt(year, digits(body)?),
        (true, 5) => {
            let (month, day) = body.split_once('-')?;
            if month.len() != 2 {
                return None;
            }
            NaiveDate::from_ymd_opt(year, digits(month)?, digits(day)?)
        }
        (false, 4) => {
            let (month, day) = body.split_at(2);
            NaiveDate::from_ymd_opt(year, digits(month)?, digits(day)?)
        }
        _ => None,
    }
}

fn is_time_part(time: &str) -> bool {
    let (clock, offset) = if let Some(clock) = time.strip_suffix('Z') {
        (clock, None)
    } else if let Some(idx) = time.rfind(['+', '-']) {
        (&time[..idx], Some(&time[idx..]))
    } else {
        (time, None)
    };

    let offset_ok = offset.is_none_or(|offset| {
        UTC_OFFSET
            .as_ref()
            .is_some_and(|re| re.is_match(offset))
    });
    offset_ok && parse_clock(clock).is_some()
}

fn parse_clock(clock: &str) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.as_ref()?.captures(clock)?;
    let part = |idx: usize| caps.get(idx).map_or(Some(0), |m| digits(m.as_str()));
    NaiveTime::from_hms_opt(part(1)?, part(2)?, part(3)?)
}

/// Validate an ISO 8601 date or date-time
#[must_use]
pub fn validate_date(value: &str, label: &str) -> RuleResult {
    if parse_iso8601(value).is_some() {
        RuleResult::valid()
    } else {
        RuleResult::invalid(
            ViolationKind::InvalidDate,
            format!("Invalid {label} input: '{value}' is not an ISO 8601 date"),
        )
    }
}

/// Validate an integer lower bound (inclusive)
#[must_use]
pub fn validate_at_least(value: i64, label: &str, min: i64) -> RuleResult {
    if value >= min {
        RuleResult::valid()
    } else {
        RuleResult::invalid(
            ViolationKind::OutOfRange,
            format!("Invalid {label} input: {value} is less than {min}"),
        )
    }
}

/// Validate an integer range (both ends exclusive)
#[must_use]
pub fn validate_between_exclusive(value: i64, label: &str, low: i64, high: i64) -> RuleResult {
    if value > low && value < high {
        RuleResult::valid()
    } else {
        RuleResult::invalid(
            ViolationKind::OutOfRange,
            format!("Invalid {label} input: {value} is not between {low} and {high}"),
        )
    }
}

/// Run a schema check against a text value
#[must_use]
pub fn apply_text_check(check: &Check, value: &str, countries: &CountryCodeList) -> RuleResult {
    match check {
        Check::OneOf { label, codes } => validate_code_list(value, label, codes),
        Check::Currency => validate_currency(value),
        Check::Country => validate_country(value, countries),
        Check::Date { label } => validate_date(value, label),
        Check::AtLeast { .. } | Check::BetweenExclusive { .. } => RuleResult::valid(),
    }
}

/// Run a schema check against an integer value
#[must_use]
pub fn apply_integer_check(check: &Check, value: i64) -> RuleResult {
    match check {
        Check::AtLeast { label, min } => validate_at_least(value, label, *min),
        Check::BetweenExclusive { label, low, high } => {
            validate_between_exclusive(value, label, *low, *high)
        }
        Check::OneOf { .. } | Check::Currency | Check::Country | Check::Date { .. } => {
            RuleResult::valid()
        }
    }
}

/// Read a text field's raw value; numbers are rendered as decimal text
///
/// # Errors
///
/// Returns a [`ViolationKind::WrongShape`] violation for booleans, mappings and sequences.
pub fn coerce_text(raw: &Value, field: &str) -> Result<String, Violation> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Violation::new(
            ViolationKind::WrongShape,
            format!("Expected text for '{field}', got {}", Shape::of(other)),
        )),
    }
}

/// Read an integer field's raw value
///
/// Accepts JSON integers, floats with no fractional part, and strings holding
/// an integer.
///
/// # Errors
///
/// Returns [`ViolationKind::InvalidInteger`] for non-integral numbers and
/// strings, [`ViolationKind::OutOfRange`] for integral numbers outside `i64`,
/// and [`ViolationKind::WrongShape`] for other shapes.
pub fn coerce_integer(raw: &Value, field: &str) -> Result<i64, Violation> {
    let not_integer = || {
        Violation::new(
            ViolationKind::InvalidInteger,
            format!("Invalid {field} input: {} is not an integer", describe(raw)),
        )
    };
    let too_large = || {
        Violation::new(
            ViolationKind::OutOfRange,
            format!("Invalid {field} input: {raw} does not fit in a 64-bit integer"),
        )
    };

    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let in_range = |f: f64| (-I64_UPPER..I64_UPPER).contains(&f);
            match n.as_f64() {
                _ if n.is_u64() => Err(too_large()),
                #[allow(clippy::cast_possible_truncation)]
                Some(f) if f.fract() == 0.0 && in_range(f) => Ok(f as i64),
                Some(f) if f.fract() == 0.0 => Err(too_large()),
                _ => Err(not_integer()),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| not_integer()),
        other => Err(Violation::new(
            ViolationKind::WrongShape,
            format!("Expected an integer for '{field}', got {}", Shape::of(other)),
        )),
    }
}
