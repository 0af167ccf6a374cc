//! Audit log entries
//!
//! One immutable entry per accepted transition. Entries are created
//! once and never updated; deletion is an administrative cleanup
//! operation restricted to the admin role, outside normal engine
//! operation.

use crate::{CollectionName, DocumentId, UserId, WorkflowId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Entry Identifier ─────────────────────────────────────────────────

/// Unique identifier for a log entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogEntryId(pub String);

impl LogEntryId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for LogEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Log Action ───────────────────────────────────────────────────────

/// What the logged transition did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Started,
    Approved,
    Rejected,
    Commented,
    Completed,
    Escalated,
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Started => "started",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Commented => "commented",
            Self::Completed => "completed",
            Self::Escalated => "escalated",
        };
        write!(f, "{}", s)
    }
}

// ── Log Entry ────────────────────────────────────────────────────────

/// One immutable audit record of a workflow transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowLogEntry {
    pub id: LogEntryId,
    /// The definition the transition ran under
    pub workflow_id: WorkflowId,
    pub document_id: DocumentId,
    pub collection: CollectionName,
    /// The step's order in text form
    pub step_id: String,
    pub step_name: String,
    pub action: LogAction,
    /// The acting identity
    pub user: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Monotonically non-decreasing per document in log order
    pub created_at: DateTime<Utc>,
}

impl WorkflowLogEntry {
    pub fn new(
        workflow_id: WorkflowId,
        document_id: DocumentId,
        collection: CollectionName,
        step_id: impl Into<String>,
        step_name: impl Into<String>,
        action: LogAction,
        user: UserId,
    ) -> Self {
        Self {
            id: LogEntryId::generate(),
            workflow_id,
            document_id,
            collection,
            step_id: step_id.into(),
            step_name: step_name.into(),
            action,
            user,
            comment: None,
            created_at: Utc::now(),
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
    fn test_entry_construction() {
        let entry = WorkflowLogEntry::new(
            WorkflowId::new("wf-1"),
            DocumentId::new("doc-1"),
            CollectionName::new("blog"),
            "1",
            "Initial Review",
            LogAction::Approved,
            UserId::new("u-1"),
        )
        .with_comment("fine by me");

        assert_eq!(entry.step_id, "1");
        assert_eq!(entry.action, LogAction::Approved);
        assert_eq!(entry.comment.as_deref(), Some("fine by me"));
    }

    #[test]
    fn test_action_serde_names() {
        assert_eq!(
            serde_json::to_string(&LogAction::Escalated).unwrap(),
            "\"escalated\""
        );
        let action: LogAction = serde_json::from_str("\"started\"").unwrap();
        assert_eq!(action, LogAction::Started);
    }
}
