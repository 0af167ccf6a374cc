//! Escalation monitor: flags mutations that newly trip a rule
//!
//! Rules are per-collection conditions over document fields (a priority
//! becoming critical, a contract amount crossing a threshold). A rule
//! fires on the rising edge only: the updated fields satisfy it and the
//! previous fields did not. Firing is advisory — it produces an audit
//! entry, never a state transition.

use crate::ConditionEvaluator;
use approval_types::{CollectionName, Condition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single escalation rule bound to a collection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscalationRule {
    /// The collection this rule watches
    pub collection: CollectionName,
    /// Human-readable label recorded when the rule fires
    pub label: String,
    /// The condition whose rising edge fires the rule
    pub trigger: Condition,
}

impl EscalationRule {
    pub fn new(
        collection: impl Into<String>,
        label: impl Into<String>,
        trigger: Condition,
    ) -> Self {
        Self {
            collection: CollectionName::new(collection),
            label: label.into(),
            trigger,
        }
    }
}

/// Watches document mutations for newly satisfied escalation rules
#[derive(Clone, Debug, Default)]
pub struct EscalationMonitor {
    rules: Vec<EscalationRule>,
    conditions: ConditionEvaluator,
}

impl EscalationMonitor {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            conditions: ConditionEvaluator::new(),
        }
    }

    pub fn add_rule(&mut self, rule: EscalationRule) {
        tracing::info!(
            collection = %rule.collection,
            label = %rule.label,
            "Escalation rule added"
        );
        self.rules.push(rule);
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rules of `collection` that the update newly satisfies.
    ///
    /// `previous` is `None` for document creation, where every satisfied
    /// rule counts as newly satisfied.
    pub fn fired<'a>(
        &'a self,
        collection: &CollectionName,
        previous: Option<&Map<String, Value>>,
        updated: &Map<String, Value>,
    ) -> Vec<&'a EscalationRule> {
        self.rules
            .iter()
            .filter(|rule| &rule.collection == collection)
            .filter(|rule| {
                let now = self
                    .conditions
                    .evaluate(std::slice::from_ref(&rule.trigger), updated);
                let before = previous.is_some_and(|fields| {
                    self.conditions
                        .evaluate(std::slice::from_ref(&rule.trigger), fields)
                });
                now && !before
            })
            .collect()
    }
}
