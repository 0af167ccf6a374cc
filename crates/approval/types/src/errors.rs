//! Error types for the approval workflow engine
//!
//! Every error except `LogWriteFailed` prevents the document mutation
//! from being applied: authorization and state checks run strictly
//! before any write. A failed audit append degrades the trail but never
//! rolls back a committed transition.

use crate::{CollectionName, DocumentId, StepOrder, UserId, WorkflowId, WorkflowStatus};

/// Errors that can occur in workflow operations
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("no active workflow for collection '{0}'")]
    NoActiveWorkflow(CollectionName),

    #[error("step '{step}' not found as current step of workflow '{workflow}'")]
    StepNotFound { workflow: WorkflowId, step: String },

    #[error("user '{user}' is not authorized to act on step {step}")]
    Forbidden { user: UserId, step: StepOrder },

    #[error("user '{0}' lacks the admin role required for this operation")]
    AdminRequired(UserId),

    #[error("workflow already terminated with status '{0}'")]
    WorkflowTerminated(WorkflowStatus),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("audit log write failed: {0}")]
    LogWriteFailed(String),

    #[error("document '{id}' not found in collection '{collection}'")]
    DocumentNotFound {
        collection: CollectionName,
        id: DocumentId,
    },

    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(String),
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
