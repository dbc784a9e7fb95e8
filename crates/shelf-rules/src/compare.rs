//! Operator evaluation over normalized values.
//!
//! Every function here is total: a comparison that cannot be made resolves
//! to the operator's safe default instead of an error.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::op::Operator;
use crate::value::Value;

/// Evaluates an equality, text, or ordering operator.
///
/// When `actual` is a list, positive operators need some element to pass
/// and negated operators need every element to pass.
pub fn matches(op: &Operator, actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Texts(items) => {
            let mut elements = items.iter().map(|item| Scalar::Text(item));
            if op.is_negated() {
                elements.all(|element| scalar(op, element, expected))
            } else {
                elements.any(|element| scalar(op, element, expected))
            }
        }
        Value::Numbers(items) => {
            let mut elements = items.iter().map(|n| Scalar::Number(*n));
            if op.is_negated() {
                elements.all(|element| scalar(op, element, expected))
            } else {
                elements.any(|element| scalar(op, element, expected))
            }
        }
        other => scalar(op, Scalar::from(other), expected),
    }
}

/// Inclusive range test. A missing record value or bound is a non-match.
pub fn in_between(actual: &Value, start: &Value, end: &Value) -> bool {
    if actual.is_null() || start.is_null() || end.is_null() {
        return false;
    }
    let (value, low, high) = (actual.to_number(), start.to_number(), end.to_number());
    // NaN on any side makes both comparisons false
    value >= low && value <= high
}

/// `includes_any`: some wanted value is present.
pub fn includes_any(projection: &[String], wanted: &[String]) -> bool {
    wanted.iter().any(|w| projection.contains(w))
}

/// `includes_all`: every wanted value is present.
pub fn includes_all(projection: &[String], wanted: &[String]) -> bool {
    wanted.iter().all(|w| projection.contains(w))
}

/// `excludes_all`: no wanted value is present.
pub fn excludes_all(projection: &[String], wanted: &[String]) -> bool {
    !includes_any(projection, wanted)
}

/// `within_last`: the record date is at or after the cutoff.
pub fn within_last(actual: &Value, cutoff: DateTime<Utc>) -> bool {
    actual.as_date().is_some_and(|date| date >= cutoff)
}

/// `older_than`: the record date is strictly before the cutoff.
pub fn older_than(actual: &Value, cutoff: DateTime<Utc>) -> bool {
    actual.as_date().is_some_and(|date| date < cutoff)
}

/// `this_period`: the record date is at or after the period start.
pub fn this_period(actual: &Value, start: DateTime<Utc>) -> bool {
    actual.as_date().is_some_and(|date| date >= start)
}

/// Borrowed view of a single (non-list) value.
#[derive(Debug, Clone, Copy)]
enum Scalar<'a> {
    Null,
    Text(&'a str),
    Number(f64),
    Date(DateTime<Utc>),
}

impl<'a> From<&'a Value> for Scalar<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Text(s) => Scalar::Text(s),
            Value::Number(n) => Scalar::Number(*n),
            Value::Date(d) => Scalar::Date(*d),
            Value::Null | Value::Texts(_) | Value::Numbers(_) => Scalar::Null,
        }
    }
}

impl Scalar<'_> {
    fn to_number(self) -> f64 {
        match self {
            Scalar::Number(n) => n,
            Scalar::Date(d) => d.timestamp_millis() as f64,
            Scalar::Text(s) => Value::Text(s.to_string()).to_number(),
            Scalar::Null => f64::NAN,
        }
    }
}

fn scalar(op: &Operator, actual: Scalar<'_>, expected: &Value) -> bool {
    match op {
        Operator::Equals => scalar_equals(actual, expected),
        Operator::NotEquals => !scalar_equals(actual, expected),
        Operator::Contains => text_op(actual, expected, false, |a, b| a.contains(b)),
        Operator::DoesNotContain => text_op(actual, expected, true, |a, b| !a.contains(b)),
        Operator::StartsWith => text_op(actual, expected, false, |a, b| a.starts_with(b)),
        Operator::EndsWith => text_op(actual, expected, false, |a, b| a.ends_with(b)),
        Operator::GreaterThan
        | Operator::GreaterThanOrEqual
        | Operator::LessThan
        | Operator::LessThanOrEqual => match ordering(actual, expected) {
            Some(ord) => op.eval_ordering(ord),
            None => false,
        },
        _ => false,
    }
}

/// Strict equality after normalization. Dates compare by instant, null
/// equals nothing, and values of different kinds are never equal.
fn scalar_equals(actual: Scalar<'_>, expected: &Value) -> bool {
    match (actual, expected) {
        (Scalar::Text(a), Value::Text(b)) => a == b,
        (Scalar::Number(a), Value::Number(b)) => a == *b,
        (Scalar::Date(a), Value::Date(b)) => a.timestamp_millis() == b.timestamp_millis(),
        _ => false,
    }
}

/// Runs a substring test when both sides are text, else returns `fallback`.
fn text_op(
    actual: Scalar<'_>,
    expected: &Value,
    fallback: bool,
    test: impl Fn(&str, &str) -> bool,
) -> bool {
    match (actual, expected) {
        (Scalar::Text(a), Value::Text(b)) => test(a, b),
        _ => fallback,
    }
}

fn ordering(actual: Scalar<'_>, expected: &Value) -> Option<Ordering> {
    if matches!(actual, Scalar::Null) || expected.is_null() {
        return None;
    }
    actual.to_number().partial_cmp(&expected.to_number())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::parse_date;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn date(s: &str) -> Value {
        Value::Date(parse_date(s).unwrap())
    }

    #[test]
    fn scalar_equality() {
        assert!(matches(&Operator::Equals, &text("epub"), &text("epub")));
        assert!(!matches(&Operator::Equals, &text("epub"), &text("pdf")));
        assert!(matches(&Operator::Equals, &Value::Number(3.0), &Value::Number(3.0)));
        assert!(matches(
            &Operator::Equals,
            &date("2024-01-02"),
            &date("2024-01-02T00:00:00Z")
        ));
        // Different kinds never compare equal
        assert!(!matches(&Operator::Equals, &Value::Number(3.0), &text("3")));
        assert!(!matches(&Operator::Equals, &Value::Null, &Value::Null));
    }

    #[test]
    fn not_equals_negates_scalars() {
        assert!(!matches(&Operator::NotEquals, &text("epub"), &text("epub")));
        assert!(matches(&Operator::NotEquals, &text("epub"), &text("pdf")));
        assert!(matches(&Operator::NotEquals, &Value::Null, &text("pdf")));
    }

    #[test]
    fn list_semantics() {
        let authors = Value::Texts(vec!["ann leckie".into(), "iain banks".into()]);
        assert!(matches(&Operator::Equals, &authors, &text("iain banks")));
        assert!(!matches(&Operator::NotEquals, &authors, &text("iain banks")));
        assert!(matches(&Operator::NotEquals, &authors, &text("jo walton")));
        assert!(matches(&Operator::Contains, &authors, &text("leck")));
        assert!(!matches(&Operator::DoesNotContain, &authors, &text("leck")));
        assert!(matches(&Operator::StartsWith, &authors, &text("iain")));

        let empty = Value::Texts(vec![]);
        assert!(!matches(&Operator::Equals, &empty, &text("x")));
        assert!(matches(&Operator::NotEquals, &empty, &text("x")));

        let shelves = Value::Numbers(vec![4.0, 9.0]);
        assert!(matches(&Operator::Equals, &shelves, &Value::Number(9.0)));
        assert!(matches(&Operator::NotEquals, &shelves, &Value::Number(1.0)));
    }

    #[test]
    fn text_ops_default_on_non_text() {
        let n = Value::Number(12.0);
        assert!(!matches(&Operator::Contains, &n, &text("1")));
        assert!(!matches(&Operator::StartsWith, &Value::Null, &text("a")));
        assert!(!matches(&Operator::EndsWith, &text("abc"), &Value::Number(1.0)));
        assert!(matches(&Operator::DoesNotContain, &n, &text("1")));
        assert!(matches(&Operator::DoesNotContain, &Value::Null, &text("1")));
        assert!(matches(&Operator::EndsWith, &text("dune messiah"), &text("messiah")));
    }

    #[test]
    fn ordering_comparisons() {
        let pages = Value::Number(300.0);
        assert!(matches(&Operator::GreaterThan, &pages, &Value::Number(299.0)));
        assert!(!matches(&Operator::GreaterThan, &pages, &Value::Number(300.0)));
        assert!(matches(&Operator::GreaterThanOrEqual, &pages, &Value::Number(300.0)));
        assert!(matches(&Operator::LessThan, &pages, &Value::Number(301.0)));
        assert!(matches(&Operator::LessThanOrEqual, &pages, &Value::Number(300.0)));

        // Text coerces numerically, prose is NaN
        assert!(matches(&Operator::LessThan, &text("12"), &Value::Number(20.0)));
        assert!(!matches(&Operator::LessThan, &text("twelve"), &Value::Number(20.0)));
        // Null never orders
        assert!(!matches(&Operator::LessThan, &Value::Null, &Value::Number(20.0)));

        assert!(matches(
            &Operator::LessThan,
            &date("2023-12-31"),
            &date("2024-01-01")
        ));
    }

    #[test]
    fn between_is_inclusive() {
        let v = Value::Number(5.0);
        assert!(in_between(&v, &Value::Number(5.0), &Value::Number(10.0)));
        assert!(in_between(&v, &Value::Number(1.0), &Value::Number(5.0)));
        assert!(!in_between(&v, &Value::Number(6.0), &Value::Number(10.0)));
        assert!(!in_between(&Value::Null, &Value::Number(1.0), &Value::Number(10.0)));
        assert!(!in_between(&v, &Value::Null, &Value::Number(10.0)));
        assert!(!in_between(&v, &Value::Number(1.0), &Value::Null));
        assert!(in_between(
            &date("2024-02-10"),
            &date("2024-02-01"),
            &date("2024-02-29")
        ));
    }

    #[test]
    fn set_operators() {
        let tags: Vec<String> = vec!["cosy".into(), "space".into()];
        let want = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert!(includes_any(&tags, &want(&["space", "war"])));
        assert!(!includes_any(&tags, &want(&["war"])));
        assert!(includes_all(&tags, &want(&["space", "cosy"])));
        assert!(!includes_all(&tags, &want(&["space", "war"])));
        assert!(excludes_all(&tags, &want(&["war", "horror"])));
        assert!(!excludes_all(&tags, &want(&["war", "cosy"])));

        // Empty wanted sets
        assert!(!includes_any(&tags, &[]));
        assert!(includes_all(&tags, &[]));
        assert!(excludes_all(&tags, &[]));
    }

    #[test]
    fn relative_date_checks() {
        let cutoff = parse_date("2024-03-01").unwrap();
        let on = date("2024-03-01");
        let before = date("2024-02-28");

        assert!(within_last(&on, cutoff));
        assert!(!older_than(&on, cutoff));
        assert!(older_than(&before, cutoff));
        assert!(!within_last(&before, cutoff));
        assert!(!within_last(&text("2024-03-05"), cutoff));
        assert!(this_period(&on, cutoff));
    }
}
