//! Actor-driven action requests
//!
//! An action request arrives from the UI or API caller together with an
//! authenticated identity. The engine validates it against the resolved
//! workflow before computing any state change.

use crate::{CollectionName, DocumentId, Identity, StepOrder};
use serde::{Deserialize, Serialize};

/// What an actor asks the engine to do with a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowAction {
    Approve,
    Reject,
    Comment,
}

impl std::fmt::Display for WorkflowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Comment => "comment",
        };
        write!(f, "{}", s)
    }
}

/// An inbound request to act on a document's current workflow step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub document_id: DocumentId,
    pub collection: CollectionName,
    /// The step the actor believes is current; stale values are refused
    pub step: StepOrder,
    pub action: WorkflowAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Authenticated actor, supplied by the calling framework
    pub actor: Identity,
}

impl ActionRequest {
    pub fn new(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        step: StepOrder,
        action: WorkflowAction,
        actor: Identity,
    ) -> Self {
        Self {
            document_id: DocumentId::new(document_id),
            collection: CollectionName::new(collection),
            step,
            action,
            comment: None,
            actor,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serde_names() {
        assert_eq!(
            serde_json::to_string(&WorkflowAction::Approve).unwrap(),
            "\"approve\""
        );
        let action: WorkflowAction = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(action, WorkflowAction::Reject);
    }

    #[test]
    fn test_request_builder() {
        let req = ActionRequest::new(
            "blog",
            "doc-1",
            StepOrder::new(1),
            WorkflowAction::Comment,
            Identity::new("u-1", "reviewer"),
        )
        .with_comment("looks good");
        assert_eq!(req.comment.as_deref(), Some("looks good"));
        assert_eq!(req.step, StepOrder::new(1));
    }
}
