//! Condition evaluator: decides whether a step's entry criteria hold
//!
//! A pure function over a document's fields — no side effects, no
//! errors. Numeric comparisons fail closed on anything that does not
//! parse as a number; a condition that cannot be evaluated is simply
//! not met.

use approval_types::{Condition, ConditionOperator};
use serde_json::{Map, Value};

/// Evaluates step entry conditions against document fields
#[derive(Clone, Copy, Debug, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a conjunction of conditions. Empty list means satisfied.
    pub fn evaluate(&self, conditions: &[Condition], fields: &Map<String, Value>) -> bool {
        conditions.iter().all(|c| self.evaluate_one(c, fields))
    }

    /// Evaluate a single condition against the document fields
    pub fn evaluate_one(&self, condition: &Condition, fields: &Map<String, Value>) -> bool {
        let field = fields.get(&condition.field);
        match condition.operator {
            ConditionOperator::Equals => match coerce_text(field) {
                Some(text) => text == condition.value,
                // Absent field never equals a literal
                None => false,
            },
            ConditionOperator::NotEquals => match coerce_text(field) {
                Some(text) => text != condition.value,
                // Absent field differs from every literal
                None => true,
            },
            ConditionOperator::GreaterThan => match (coerce_number(field), parse_number(&condition.value)) {
                (Some(actual), Some(threshold)) => actual > threshold,
                _ => false,
            },
            ConditionOperator::LessThan => match (coerce_number(field), parse_number(&condition.value)) {
                (Some(actual), Some(threshold)) => actual < threshold,
                _ => false,
            },
            ConditionOperator::Contains => match coerce_text(field) {
                Some(text) => text.contains(&condition.value),
                None => false,
            },
        }
    }
}

/// Coerce a JSON field to its textual representation.
///
/// Absent fields and JSON null yield `None`; arrays and objects have no
/// sensible text form and also yield `None`.
fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce a JSON field to a float for numeric comparison
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}
