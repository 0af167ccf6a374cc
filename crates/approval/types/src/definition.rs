//! Workflow definitions: the blueprint for an approval process
//!
//! A WorkflowDefinition is an ordered sequence of steps bound to one
//! document collection. Step order numbers are the traversal path: they
//! must be strictly increasing but need not be contiguous — gaps are
//! skipped transparently.

use crate::{Condition, RoleName, UserId, WorkflowError, WorkflowResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a workflow definition
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The collection (document type) a workflow governs, e.g. "blog"
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(pub String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A step's ordinal within its workflow — the traversal key
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepOrder(pub u32);

impl StepOrder {
    pub fn new(order: u32) -> Self {
        Self(order)
    }

    /// Text encoding used in documents and log entries
    pub fn as_text(&self) -> String {
        self.0.to_string()
    }

    /// Parse the text encoding back into an order
    pub fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse::<u32>().ok().map(Self)
    }
}

impl std::fmt::Display for StepOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Step ─────────────────────────────────────────────────────────────

/// The kind of a workflow step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepType {
    /// Formal approval — accepts approve and reject
    Approval,
    /// Content review — accepts approve and reject
    Review,
    /// Final sign-off — accepts approve and reject
    SignOff,
    /// Accepts comments only, never approve/reject transitions
    CommentOnly,
}

impl StepType {
    /// Whether this step accepts approve/reject actions
    pub fn accepts_decisions(&self) -> bool {
        !matches!(self, Self::CommentOnly)
    }
}

/// Who may act on a step — a specific user or anyone holding a role
///
/// A closed tagged union: there is no unrecognized assignment kind to
/// fail open on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Assignment {
    /// A single named user
    User { user: UserId },
    /// Any user holding the given role
    Role { role: RoleName },
}

impl Assignment {
    pub fn user(id: impl Into<String>) -> Self {
        Self::User {
            user: UserId::new(id),
        }
    }

    pub fn role(name: impl Into<String>) -> Self {
        Self::Role {
            role: RoleName::new(name),
        }
    }
}

/// One stage of an approval workflow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Ordinal within the workflow; positive, strictly increasing
    pub order: StepOrder,
    /// Human-readable name, e.g. "Legal Review"
    pub name: String,
    /// What kind of step this is
    pub step_type: StepType,
    /// Who may act on this step
    pub assigned_to: Assignment,
    /// Entry conditions, AND-combined; empty means always eligible
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Advisory SLA in hours; not enforced by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla_hours: Option<u32>,
}

impl Step {
    pub fn new(order: u32, name: impl Into<String>, step_type: StepType, assigned_to: Assignment) -> Self {
        Self {
            order: StepOrder::new(order),
            name: name.into(),
            step_type,
            assigned_to,
            conditions: Vec::new(),
            sla_hours: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_sla_hours(mut self, hours: u32) -> Self {
        self.sla_hours = Some(hours);
        self
    }
}

// ── Workflow Definition ──────────────────────────────────────────────

/// A workflow definition — the approval process bound to one collection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Unique identifier
    pub id: WorkflowId,
    /// Human-readable name, e.g. "Blog Approval Process"
    pub name: String,
    /// What this workflow accomplishes
    pub description: String,
    /// The collection this workflow governs
    pub target_collection: CollectionName,
    /// Whether this definition is currently in force
    pub is_active: bool,
    /// The ordered steps of the process
    pub steps: Vec<Step>,
    /// When this definition was created
    pub created_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    /// Create a new, active workflow definition with no steps yet
    pub fn new(name: impl Into<String>, target_collection: impl Into<String>) -> Self {
        Self {
            id: WorkflowId::generate(),
            name: name.into(),
            description: String::new(),
            target_collection: CollectionName::new(target_collection),
            is_active: true,
            steps: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = WorkflowId::new(id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Append a step. Order must be strictly greater than the last step's.
    pub fn add_step(&mut self, step: Step) -> WorkflowResult<()> {
        if step.order.0 == 0 {
            return Err(WorkflowError::InvalidDefinition(
                "step order must be positive".into(),
            ));
        }
        if let Some(last) = self.steps.last() {
            if step.order <= last.order {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "step order {} does not increase past {}",
                    step.order, last.order
                )));
            }
        }
        self.steps.push(step);
        Ok(())
    }

    /// Builder form of [`add_step`](Self::add_step); panics on misordered
    /// steps, so it is meant for statically-known definitions
    pub fn with_step(mut self, step: Step) -> Self {
        if let Err(e) = self.add_step(step) {
            panic!("with_step: {e}");
        }
        self
    }

    /// The entry step: lowest order
    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// Look up a step by its order
    pub fn step_by_order(&self, order: StepOrder) -> Option<&Step> {
        self.steps.iter().find(|s| s.order == order)
    }

    /// All steps with order strictly greater than `order`, ascending
    pub fn steps_after(&self, order: StepOrder) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.order > order)
    }

    /// Validate structural correctness: at least one step, positive
    /// orders, strictly increasing sequence
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.steps.is_empty() {
            return Err(WorkflowError::InvalidDefinition(
                "workflow must have at least one step".into(),
            ));
        }
        let mut previous: Option<StepOrder> = None;
        for step in &self.steps {
            if step.order.0 == 0 {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "step '{}' has non-positive order",
                    step.name
                )));
            }
            if let Some(prev) = previous {
                if step.order <= prev {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "step orders must be strictly increasing ({} follows {})",
                        step.order, prev
                    )));
                }
            }
            previous = Some(step.order);
        }
        Ok(())
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
