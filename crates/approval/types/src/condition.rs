//! Step entry conditions
//!
//! A condition compares one document field against a literal value.
//! A step's conditions are AND-combined; an empty list means the step
//! is always eligible. Evaluation lives in the engine crate — these are
//! pure data.

use serde::{Deserialize, Serialize};

/// Comparison operator for a [`Condition`]
///
/// A closed set: matching is exhaustive, there is no default branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Textual equality after coercing the field to its string form
    Equals,
    /// Textual inequality; satisfied by an absent field
    NotEquals,
    /// Numeric comparison; both sides parsed as floating point
    GreaterThan,
    /// Numeric comparison; both sides parsed as floating point
    LessThan,
    /// Substring match on the string coercion of the field
    Contains,
}

impl std::fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Contains => "contains",
        };
        write!(f, "{}", s)
    }
}

/// One entry condition on a workflow step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Name of the document attribute to inspect
    pub field: String,
    /// How to compare the field against the literal
    pub operator: ConditionOperator,
    /// Literal to compare against, coerced per operator
    pub value: String,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_serde_names() {
        let json = serde_json::to_string(&ConditionOperator::NotEquals).unwrap();
        assert_eq!(json, "\"not_equals\"");
        let op: ConditionOperator = serde_json::from_str("\"greater_than\"").unwrap();
        assert_eq!(op, ConditionOperator::GreaterThan);
    }

    #[test]
    fn test_condition_roundtrip() {
        let cond = Condition::new("priority", ConditionOperator::Equals, "high");
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["field"], "priority");
        assert_eq!(json["operator"], "equals");
        let back: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(back, cond);
    }
}
