//! Leaf rules: one field, one operator, one or two values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::debug;

use crate::book::Book;
use crate::compare;
use crate::extract::{canonical_file_type, extract, extract_projection};
use crate::field::{Field, FieldType};
use crate::op::Operator;
use crate::series::{self, SeriesSource};
use crate::temporal::{self, DateUnit, Period, WeekStart};
use crate::value::{self, parse_date, Value};

/// A single leaf predicate.
///
/// `value` carries the comparison value. `valueStart`/`valueEnd` carry the
/// bounds of `in_between`; for `within_last`/`older_than`, `valueEnd` names
/// the unit of the amount in `value`. `this_period` takes its period from
/// `value`, or from `valueEnd` when `value` is absent.
///
/// # Example
///
/// ```
/// use shelf_rules::{Field, Operator, Rule};
///
/// let rule = Rule::new(Field::PageCount, Operator::GreaterThan, 300);
/// assert_eq!(rule.field, Field::PageCount);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub field: Field,
    pub operator: Operator,
    #[serde(default)]
    pub value: Option<Json>,
    #[serde(default)]
    pub value_start: Option<Json>,
    #[serde(default)]
    pub value_end: Option<Json>,
}

/// Everything a rule needs besides the record: the clock and the siblings
/// source for composite fields.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub now: DateTime<Utc>,
    pub week_start: WeekStart,
    pub series: SeriesSource<'a>,
}

impl<'a> Scope<'a> {
    /// A scope that scans `books` for series siblings.
    pub fn new(now: DateTime<Utc>, books: &'a [Book]) -> Self {
        Scope {
            now,
            week_start: WeekStart::default(),
            series: SeriesSource::Scan(books),
        }
    }
}

impl Rule {
    /// Creates a rule with a single value.
    pub fn new(
        field: impl Into<Field>,
        operator: impl Into<Operator>,
        value: impl Into<Json>,
    ) -> Self {
        Rule {
            field: field.into(),
            operator: operator.into(),
            value: Some(value.into()),
            value_start: None,
            value_end: None,
        }
    }

    /// Creates an `in_between` rule.
    pub fn between(field: impl Into<Field>, start: impl Into<Json>, end: impl Into<Json>) -> Self {
        Rule {
            field: field.into(),
            operator: Operator::InBetween,
            value: None,
            value_start: Some(start.into()),
            value_end: Some(end.into()),
        }
    }

    /// Creates a rule without a value (`is_empty`, `is_not_empty`).
    pub fn unary(field: impl Into<Field>, operator: impl Into<Operator>) -> Self {
        Rule {
            field: field.into(),
            operator: operator.into(),
            value: None,
            value_start: None,
            value_end: None,
        }
    }

    /// Sets the unit of a relative-date amount.
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.value_end = Some(Json::String(unit.to_string()));
        self
    }

    /// Evaluates this rule against a record.
    pub fn matches(&self, book: &Book, scope: &Scope<'_>) -> bool {
        if let Operator::Unknown(name) = &self.operator {
            debug!(operator = %name, field = %self.field, "unknown operator, rule fails closed");
            return false;
        }
        if self.field.is_composite() {
            return self.matches_composite(book, scope.series);
        }

        match &self.operator {
            Operator::IncludesAny | Operator::IncludesAll | Operator::ExcludesAll => {
                let projection = extract_projection(book, &self.field);
                let wanted = self.wanted_values();
                match self.operator {
                    Operator::IncludesAny => compare::includes_any(&projection, &wanted),
                    Operator::IncludesAll => compare::includes_all(&projection, &wanted),
                    _ => compare::excludes_all(&projection, &wanted),
                }
            }
            Operator::IsEmpty => extract(book, &self.field).is_empty(),
            Operator::IsNotEmpty => !extract(book, &self.field).is_empty(),
            Operator::InBetween => {
                let actual = extract(book, &self.field).normalize();
                let start = self.coerce(self.value_start.as_ref()).normalize();
                let end = self.coerce(self.value_end.as_ref()).normalize();
                compare::in_between(&actual, &start, &end)
            }
            Operator::WithinLast | Operator::OlderThan => {
                let actual = extract(book, &self.field).normalize();
                let unit = DateUnit::parse(self.value_end.as_ref().and_then(Json::as_str));
                let Some(cutoff) = temporal::cutoff(scope.now, self.amount(), unit) else {
                    return false;
                };
                if self.operator == Operator::WithinLast {
                    compare::within_last(&actual, cutoff)
                } else {
                    compare::older_than(&actual, cutoff)
                }
            }
            Operator::ThisPeriod => {
                let actual = extract(book, &self.field).normalize();
                let period = Period::parse(
                    self.value
                        .as_ref()
                        .and_then(Json::as_str)
                        .or_else(|| self.value_end.as_ref().and_then(Json::as_str)),
                );
                temporal::period_start(scope.now, period, scope.week_start)
                    .is_some_and(|start| compare::this_period(&actual, start))
            }
            op => {
                let actual = extract(book, &self.field).normalize();
                compare::matches(op, &actual, &self.expected())
            }
        }
    }

    fn matches_composite(&self, book: &Book, source: SeriesSource<'_>) -> bool {
        let positive = |value: &str| series::evaluate(book, &self.field, value, source);
        match self.operator {
            Operator::Equals => self.composite_value().is_some_and(|v| positive(&v)),
            Operator::NotEquals => !self.composite_value().is_some_and(|v| positive(&v)),
            Operator::IncludesAny => self.wanted_values().iter().any(|v| positive(v)),
            Operator::IncludesAll => self.wanted_values().iter().all(|v| positive(v)),
            Operator::ExcludesAll => !self.wanted_values().iter().any(|v| positive(v)),
            _ => false,
        }
    }

    fn composite_value(&self) -> Option<String> {
        self.value
            .as_ref()
            .and_then(Json::as_str)
            .map(|s| s.trim().to_lowercase())
    }

    /// The normalized comparison value, with format synonyms folded for `fileType`.
    fn expected(&self) -> Value {
        let coerced = self.coerce(self.value.as_ref());
        match (&self.field, coerced) {
            (Field::FileType, Value::Text(s)) => Value::Text(canonical_file_type(&s)),
            (_, other) => other,
        }
        .normalize()
    }

    /// Rule values for set operators, lower-cased. A scalar counts as a one-element set.
    fn wanted_values(&self) -> Vec<String> {
        match &self.value {
            Some(Json::Array(items)) => items.iter().filter_map(value::json_scalar_text).collect(),
            Some(scalar) => value::json_scalar_text(scalar).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Relative-date amount; NaN when missing or not numeric.
    fn amount(&self) -> f64 {
        match &self.value {
            Some(Json::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(Json::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
            _ => f64::NAN,
        }
    }

    /// Parses a raw rule value according to the field's declared type.
    fn coerce(&self, raw: Option<&Json>) -> Value {
        let Some(raw) = raw else {
            return Value::Null;
        };
        match (self.field.field_type(), raw) {
            (_, Json::Null) => Value::Null,
            (FieldType::Number, Json::String(s)) => Value::Number(parse_leading_int(s)),
            (FieldType::Decimal | FieldType::Id | FieldType::IdArray, Json::String(s)) => {
                Value::Number(s.trim().parse().unwrap_or(f64::NAN))
            }
            (FieldType::Date, Json::String(s)) => Value::date(Some(s)),
            (FieldType::Date, Json::Number(n)) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map_or(Value::Null, Value::Date),
            // Custom attributes keep their JSON kind
            (_, Json::Number(n)) if matches!(self.field, Field::Custom(_)) => {
                Value::number(n.as_f64())
            }
            (FieldType::String | FieldType::Array | FieldType::Composite, Json::Number(n)) => {
                Value::Text(value::format_number(n.as_f64().unwrap_or(f64::NAN)))
            }
            (_, Json::Number(n)) => Value::number(n.as_f64()),
            (_, Json::String(s)) => Value::Text(s.clone()),
            (_, Json::Bool(b)) => Value::Text(b.to_string()),
            (_, Json::Array(_) | Json::Object(_)) => Value::Null,
        }
    }

    /// Copy of this rule in its persisted shape: date values under
    /// absolute operators are written as `YYYY-MM-DD`; relative-date
    /// operators keep their raw amount and unit.
    pub fn to_persisted(&self) -> Rule {
        let mut rule = self.clone();
        if self.field.field_type() == FieldType::Date && !self.operator.is_relative_date() {
            for slot in [&mut rule.value, &mut rule.value_start, &mut rule.value_end] {
                if let Some(Json::String(s)) = slot {
                    if let Some(date) = parse_date(s) {
                        *s = date.format("%Y-%m-%d").to_string();
                    }
                }
            }
        }
        rule
    }
}

/// Whole-number parsing of user-typed values: `"3.7"` is 3, `"12 pages"` is 12.
fn parse_leading_int(s: &str) -> f64 {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse::<i64>().map_or(f64::NAN, |n| n as f64)
}
