//! Authorization checker: decides who may act on a step
//!
//! Pure and thread-safe. This check gates every state-changing action
//! and runs before any document mutation is computed.

use approval_types::{Assignment, Identity, Step};

/// Decides whether an identity may act on a workflow step
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthorizationChecker;

impl AuthorizationChecker {
    pub fn new() -> Self {
        Self
    }

    /// Authorized iff the actor matches the step's assignment:
    /// role assignments compare roles, user assignments compare ids.
    pub fn is_authorized(&self, step: &Step, actor: &Identity) -> bool {
        match &step.assigned_to {
            Assignment::Role { role } => &actor.role == role,
            Assignment::User { user } => &actor.id == user,
        }
    }
}
