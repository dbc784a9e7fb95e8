//! Normalized runtime values.
//!
//! The extractor turns record attributes into [`Value`]s, rule values are
//! coerced into the same shape, and the operator evaluator compares the two.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Strings shaped like an ISO date or timestamp. Anything else stays text.
static DATE_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("date pattern is valid")
});

/// A value extracted from a record or coerced from a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent, null, or not representable.
    Null,
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    /// Multi-valued text (authors, categories, moods, tags).
    Texts(Vec<String>),
    /// Multi-valued numbers (shelf ids).
    Numbers(Vec<f64>),
}

impl Value {
    /// Builds a text value, or `Null` when there is no text.
    pub fn text(s: Option<&str>) -> Value {
        s.map_or(Value::Null, |s| Value::Text(s.to_string()))
    }

    /// Builds a number value, or `Null` when there is no number.
    pub fn number(n: Option<f64>) -> Value {
        n.map_or(Value::Null, Value::Number)
    }

    /// Builds a date value from a textual timestamp, `Null` when missing or unparsable.
    pub fn date(s: Option<&str>) -> Value {
        s.and_then(parse_date).map_or(Value::Null, Value::Date)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for the multi-valued variants.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::Texts(_) | Value::Numbers(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Applies the comparison normalization.
    ///
    /// Text that parses as a date becomes a [`Value::Date`]; other text is
    /// lower-cased. Every other variant is returned unchanged.
    pub fn normalize(self) -> Value {
        match self {
            Value::Text(s) => match parse_date(&s) {
                Some(date) => Value::Date(date),
                None => Value::Text(s.to_lowercase()),
            },
            other => other,
        }
    }

    /// Numeric coercion used by ordering operators.
    ///
    /// Dates compare by epoch milliseconds, blank text is zero, and anything
    /// that is not a number (lists, null, prose) is NaN so that every
    /// ordering comparison against it fails.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Date(d) => d.timestamp_millis() as f64,
            Value::Text(s) if s.trim().is_empty() => 0.0,
            Value::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    /// Emptiness as seen by `is_empty`: null, blank text, and empty lists.
    /// Zero is a value, not emptiness.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Texts(items) => items.is_empty(),
            Value::Numbers(items) => items.is_empty(),
            Value::Number(_) | Value::Date(_) => false,
        }
    }

    /// Flattens the value into lower-cased strings for set operators.
    pub fn projection(&self) -> Vec<String> {
        match self {
            Value::Null => Vec::new(),
            Value::Text(s) => vec![s.to_lowercase()],
            Value::Number(n) => vec![format_number(*n)],
            Value::Date(d) => vec![d.format("%Y-%m-%d").to_string()],
            Value::Texts(items) => items.iter().map(|s| s.to_lowercase()).collect(),
            Value::Numbers(items) => items.iter().map(|n| format_number(*n)).collect(),
        }
    }
}

/// Parses ISO dates (`2024-03-10`), naive timestamps, and RFC 3339 timestamps.
///
/// Naive values are taken as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if !DATE_LIKE.is_match(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Formats a number the way it is written in filters: integers without a
/// fractional part, everything else as-is.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Converts an arbitrary JSON attribute into a value, used for custom fields.
pub fn from_json(json: &serde_json::Value) -> Value {
    use serde_json::Value as Json;

    match json {
        Json::Null | Json::Object(_) => Value::Null,
        Json::Bool(b) => Value::Text(b.to_string()),
        Json::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => {
            if !items.is_empty() && items.iter().all(Json::is_number) {
                Value::Numbers(items.iter().filter_map(Json::as_f64).collect())
            } else {
                Value::Texts(items.iter().filter_map(json_scalar_text).collect())
            }
        }
    }
}

/// Renders a JSON scalar as lower-cased text; nulls and containers are skipped.
pub(crate) fn json_scalar_text(json: &serde_json::Value) -> Option<String> {
    use serde_json::Value as Json;

    match json {
        Json::String(s) => Some(s.to_lowercase()),
        Json::Number(n) => n.as_f64().map(format_number),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
