//! Governed documents: the workflow fields and the engine's view
//!
//! The business record itself is owned externally. The engine reads the
//! document's workflow fields plus whatever business fields its
//! conditions reference, and writes back only the workflow fields.

use crate::StepOrder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CollectionName;

// ── Document Identifier ──────────────────────────────────────────────

/// Unique identifier for a governed document
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Workflow Status ──────────────────────────────────────────────────

/// Where a document stands in its workflow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStatus {
    /// No workflow has been initialized for this document
    NotStarted,
    /// The document sits at some step of its workflow
    InProgress,
    /// All steps finished; terminal
    Completed,
    /// Rejected at some step; terminal
    Rejected,
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

// ── Workflow State ───────────────────────────────────────────────────

/// The workflow fields carried by a governed document
///
/// `current_step` references a step's order and is encoded as text in
/// the stored document; it is `None` whenever the status is not
/// `InProgress`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    #[serde(with = "step_order_text", default)]
    pub current_step: Option<StepOrder>,
}

impl WorkflowState {
    /// State for a document with no workflow bound
    pub fn not_started() -> Self {
        Self {
            status: WorkflowStatus::NotStarted,
            current_step: None,
        }
    }

    /// State for a document sitting at the given step
    pub fn in_progress(step: StepOrder) -> Self {
        Self {
            status: WorkflowStatus::InProgress,
            current_step: Some(step),
        }
    }

    pub fn completed() -> Self {
        Self {
            status: WorkflowStatus::Completed,
            current_step: None,
        }
    }

    pub fn rejected() -> Self {
        Self {
            status: WorkflowStatus::Rejected,
            current_step: None,
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            WorkflowStatus::Completed | WorkflowStatus::Rejected
        )
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::not_started()
    }
}

/// Serde encoding of `Option<StepOrder>` as optional text, matching the
/// stored document representation
mod step_order_text {
    use super::StepOrder;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<StepOrder>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(order) => serializer.serialize_some(&order.as_text()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<StepOrder>, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        match text {
            Some(t) => StepOrder::parse_text(&t)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid step order '{}'", t))),
            None => Ok(None),
        }
    }
}

// ── Document Snapshot ────────────────────────────────────────────────

/// A point-in-time view of a governed document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub collection: CollectionName,
    /// The workflow fields; only part of the document the engine writes
    pub workflow: WorkflowState,
    /// Opaque business fields, readable by conditions
    pub fields: Map<String, Value>,
}

impl DocumentSnapshot {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(id),
            collection: CollectionName::new(collection),
            workflow: WorkflowState::not_started(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
