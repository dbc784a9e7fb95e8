//! Rule operators.
//!
//! The [`Operator`] enum defines every operator a persisted rule may name.
//! Names that are not recognised deserialize to [`Operator::Unknown`] and
//! make their rule fail closed.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparison operator of a rule.
///
/// Operators are grouped by the values they apply to:
/// - **Equality**: `Equals`, `NotEquals`
/// - **Text**: `Contains`, `DoesNotContain`, `StartsWith`, `EndsWith`
/// - **Ordering**: `GreaterThan`, `GreaterThanOrEqual`, `LessThan`, `LessThanOrEqual`, `InBetween`
/// - **Emptiness**: `IsEmpty`, `IsNotEmpty`
/// - **Sets**: `IncludesAny`, `IncludesAll`, `ExcludesAll`
/// - **Relative dates**: `WithinLast`, `OlderThan`, `ThisPeriod`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// Inclusive range test between `valueStart` and `valueEnd`.
    InBetween,
    IsEmpty,
    IsNotEmpty,
    IncludesAny,
    IncludesAll,
    ExcludesAll,
    WithinLast,
    OlderThan,
    ThisPeriod,
    /// An operator name this engine does not know.
    Unknown(String),
}

impl Operator {
    /// Parses an operator name. Unknown names are preserved.
    pub fn from_name(name: &str) -> Operator {
        match name {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "does_not_contain" => Operator::DoesNotContain,
            "starts_with" => Operator::StartsWith,
            "ends_with" => Operator::EndsWith,
            "greater_than" => Operator::GreaterThan,
            "greater_than_equal_to" | "greater_than_or_equal" => Operator::GreaterThanOrEqual,
            "less_than" => Operator::LessThan,
            "less_than_equal_to" | "less_than_or_equal" => Operator::LessThanOrEqual,
            "in_between" => Operator::InBetween,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            "includes_any" => Operator::IncludesAny,
            "includes_all" => Operator::IncludesAll,
            "excludes_all" => Operator::ExcludesAll,
            "within_last" => Operator::WithinLast,
            "older_than" => Operator::OlderThan,
            "this_period" => Operator::ThisPeriod,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// Returns the persisted name of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does_not_contain",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanOrEqual => "greater_than_equal_to",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEqual => "less_than_equal_to",
            Operator::InBetween => "in_between",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::IncludesAny => "includes_any",
            Operator::IncludesAll => "includes_all",
            Operator::ExcludesAll => "excludes_all",
            Operator::WithinLast => "within_last",
            Operator::OlderThan => "older_than",
            Operator::ThisPeriod => "this_period",
            Operator::Unknown(name) => name,
        }
    }

    /// Returns `true` for operators that assert absence.
    ///
    /// On multi-valued fields these require every element to pass; all
    /// others require some element to pass.
    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::NotEquals | Operator::DoesNotContain)
    }

    /// Returns `true` for the substring family.
    pub fn is_text_op(&self) -> bool {
        matches!(
            self,
            Operator::Contains
                | Operator::DoesNotContain
                | Operator::StartsWith
                | Operator::EndsWith
        )
    }

    /// Returns `true` for the set operators, which read the raw list projection.
    pub fn is_set_op(&self) -> bool {
        matches!(
            self,
            Operator::IncludesAny | Operator::IncludesAll | Operator::ExcludesAll
        )
    }

    /// Returns `true` for operators measured relative to "now".
    ///
    /// Their rule values are persisted raw rather than as dates.
    pub fn is_relative_date(&self) -> bool {
        matches!(
            self,
            Operator::WithinLast | Operator::OlderThan | Operator::ThisPeriod
        )
    }

    /// Evaluates an ordering operator given the ordering of record value to rule value.
    pub fn eval_ordering(&self, ordering: Ordering) -> bool {
        match self {
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            _ => false, // Not an ordering-based operator
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match Operator::from_name(&name) {
            Operator::Unknown(_) => Operator::Unknown(name),
            known => known,
        }
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Operator::from_name(name)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_groups() {
        assert!(Operator::NotEquals.is_negated());
        assert!(Operator::DoesNotContain.is_negated());
        assert!(!Operator::ExcludesAll.is_negated());

        assert!(Operator::StartsWith.is_text_op());
        assert!(!Operator::Equals.is_text_op());

        assert!(Operator::IncludesAll.is_set_op());
        assert!(!Operator::Contains.is_set_op());

        assert!(Operator::ThisPeriod.is_relative_date());
        assert!(!Operator::InBetween.is_relative_date());
    }

    #[test]
    fn op_names() {
        assert_eq!(
            Operator::from_name("greater_than_or_equal"),
            Operator::GreaterThanOrEqual
        );
        assert_eq!(Operator::GreaterThanOrEqual.as_str(), "greater_than_equal_to");
        assert_eq!(
            Operator::from_name("matches_regex"),
            Operator::Unknown("matches_regex".into())
        );
        assert_eq!(Operator::WithinLast.to_string(), "within_last");
    }

    #[test]
    fn op_eval_ordering() {
        assert!(Operator::GreaterThan.eval_ordering(Ordering::Greater));
        assert!(!Operator::GreaterThan.eval_ordering(Ordering::Equal));

        assert!(Operator::GreaterThanOrEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::GreaterThanOrEqual.eval_ordering(Ordering::Less));

        assert!(Operator::LessThan.eval_ordering(Ordering::Less));
        assert!(!Operator::LessThan.eval_ordering(Ordering::Equal));

        assert!(Operator::LessThanOrEqual.eval_ordering(Ordering::Equal));
        assert!(!Operator::LessThanOrEqual.eval_ordering(Ordering::Greater));

        // Not an ordering operator
        assert!(!Operator::Equals.eval_ordering(Ordering::Equal));
    }

    #[test]
    fn serde_preserves_unknown_names() {
        let op: Operator = serde_json::from_str(r#""fuzzy_match""#).unwrap();
        assert_eq!(op, Operator::Unknown("fuzzy_match".into()));
        assert_eq!(serde_json::to_string(&op).unwrap(), r#""fuzzy_match""#);
    }
}
