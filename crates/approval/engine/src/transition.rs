//! Transition engine: the workflow state machine
//!
//! Computes a document's next workflow state for a requested action
//! (approve, reject, comment) or a condition-triggered auto-advance.
//! Authorization and terminal-state checks run before any next state is
//! computed; the caller applies the result to the document write and
//! only afterwards appends the audit entry.

use crate::{AuthorizationChecker, ConditionEvaluator};
use approval_types::{
    ActionRequest, DocumentSnapshot, Identity, LogAction, Step, StepOrder, WorkflowAction,
    WorkflowDefinition, WorkflowError, WorkflowResult, WorkflowState,
};

/// A computed workflow transition: the next state plus its audit seed
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Workflow state before the transition
    pub from: WorkflowState,
    /// Workflow state to merge into the document write
    pub to: WorkflowState,
    /// The step the transition acted on
    pub step: StepOrder,
    /// That step's name, for the audit entry
    pub step_name: String,
    /// What to record in the audit log
    pub action: LogAction,
    /// Comment text, when the action carried one
    pub comment: Option<String>,
}

impl Transition {
    /// Whether the transition changes the document's workflow fields
    pub fn changes_state(&self) -> bool {
        self.from != self.to
    }
}

/// Manages workflow step transitions
///
/// Stateless: composes the pure condition evaluator and authorization
/// checker, and owns no storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionEngine {
    conditions: ConditionEvaluator,
    authorization: AuthorizationChecker,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self {
            conditions: ConditionEvaluator::new(),
            authorization: AuthorizationChecker::new(),
        }
    }

    /// The transition that initializes a freshly created document:
    /// entry at the lowest-order step, status in-progress.
    pub fn initial_transition(&self, definition: &WorkflowDefinition) -> WorkflowResult<Transition> {
        let first = definition.first_step().ok_or_else(|| {
            WorkflowError::InvalidDefinition("workflow has no steps".into())
        })?;
        Ok(Transition {
            from: WorkflowState::not_started(),
            to: WorkflowState::in_progress(first.order),
            step: first.order,
            step_name: first.name.clone(),
            action: LogAction::Started,
            comment: None,
        })
    }

    /// Compute the transition for an actor-driven action request.
    ///
    /// Checks run in a fixed order: terminal state, step resolution,
    /// authorization, action validity. Nothing is written here.
    pub fn apply_action(
        &self,
        definition: &WorkflowDefinition,
        document: &DocumentSnapshot,
        request: &ActionRequest,
    ) -> WorkflowResult<Transition> {
        if document.workflow.is_terminal() {
            return Err(WorkflowError::WorkflowTerminated(document.workflow.status));
        }

        let step = self.resolve_current_step(definition, document, request.step)?;

        if !self.authorization.is_authorized(step, &request.actor) {
            return Err(WorkflowError::Forbidden {
                user: request.actor.id.clone(),
                step: step.order,
            });
        }

        match request.action {
            WorkflowAction::Comment => self.comment_transition(document, step, request),
            WorkflowAction::Approve => {
                if !step.step_type.accepts_decisions() {
                    return Err(WorkflowError::InvalidAction(format!(
                        "step '{}' is comment-only and cannot be approved",
                        step.name
                    )));
                }
                Ok(self.advance_transition(definition, document, step))
            }
            WorkflowAction::Reject => {
                if !step.step_type.accepts_decisions() {
                    return Err(WorkflowError::InvalidAction(format!(
                        "step '{}' is comment-only and cannot be rejected",
                        step.name
                    )));
                }
                Ok(Transition {
                    from: document.workflow.clone(),
                    to: WorkflowState::rejected(),
                    step: step.order,
                    step_name: step.name.clone(),
                    action: LogAction::Rejected,
                    comment: request.comment.clone(),
                })
            }
        }
    }

    /// Attempt one condition-triggered advance after an accepted
    /// document mutation.
    ///
    /// Fires only when the current step's conditions hold against the
    /// updated fields AND the mutating identity is the step's assignee —
    /// conditions are bypassed for nobody, authorization for nobody
    /// either. At most one advance per mutation; no cascading.
    pub fn auto_advance(
        &self,
        definition: &WorkflowDefinition,
        document: &DocumentSnapshot,
        actor: &Identity,
    ) -> Option<Transition> {
        if document.workflow.is_terminal() {
            return None;
        }
        let current = document.workflow.current_step?;
        let step = definition.step_by_order(current)?;

        if !self.conditions.evaluate(&step.conditions, &document.fields) {
            return None;
        }
        if !self.authorization.is_authorized(step, actor) {
            return None;
        }

        tracing::debug!(
            document = %document.id,
            step = %step.order,
            "Auto-advance conditions met for current step"
        );
        Some(self.advance_transition(definition, document, step))
    }

    // ── Internal helpers ─────────────────────────────────────────────

    /// Resolve the requested step, refusing stale or unknown orders.
    ///
    /// A replayed request naming a step the document has already moved
    /// past resolves here to `StepNotFound`, never to a second advance.
    fn resolve_current_step<'a>(
        &self,
        definition: &'a WorkflowDefinition,
        document: &DocumentSnapshot,
        requested: StepOrder,
    ) -> WorkflowResult<&'a Step> {
        let step = definition.step_by_order(requested).ok_or_else(|| {
            WorkflowError::StepNotFound {
                workflow: definition.id.clone(),
                step: requested.as_text(),
            }
        })?;
        if document.workflow.current_step != Some(requested) {
            return Err(WorkflowError::StepNotFound {
                workflow: definition.id.clone(),
                step: requested.as_text(),
            });
        }
        Ok(step)
    }

    /// Advance past `step`: enter the next eligible step, or complete.
    ///
    /// "Next eligible" is the lowest order strictly greater than the
    /// current one whose entry conditions hold against the document's
    /// fields. Steps whose conditions fail are skipped silently; order
    /// gaps are skipped transparently.
    fn advance_transition(
        &self,
        definition: &WorkflowDefinition,
        document: &DocumentSnapshot,
        step: &Step,
    ) -> Transition {
        let next = definition
            .steps_after(step.order)
            .find(|s| self.conditions.evaluate(&s.conditions, &document.fields));

        match next {
            Some(next_step) => Transition {
                from: document.workflow.clone(),
                to: WorkflowState::in_progress(next_step.order),
                step: step.order,
                step_name: step.name.clone(),
                action: LogAction::Approved,
                comment: None,
            },
            None => Transition {
                from: document.workflow.clone(),
                to: WorkflowState::completed(),
                step: step.order,
                step_name: step.name.clone(),
                action: LogAction::Completed,
                comment: None,
            },
        }
    }

    fn comment_transition(
        &self,
        document: &DocumentSnapshot,
        step: &Step,
        request: &ActionRequest,
    ) -> WorkflowResult<Transition> {
        let text = request
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                WorkflowError::InvalidAction("comment action requires non-empty text".into())
            })?;

        Ok(Transition {
            from: document.workflow.clone(),
            to: document.workflow.clone(),
            step: step.order,
            step_name: step.name.clone(),
            action: LogAction::Commented,
            comment: Some(text.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approval_types::{
        Assignment, Condition, ConditionOperator, StepType, WorkflowStatus,
    };

    fn make_definition() -> WorkflowDefinition {
        WorkflowDefinition::new("Blog Approval", "blog")
            .with_id("wf-1")
            .with_step(Step::new(1, "Review", StepType::Review, Assignment::role("reviewer")))
            .with_step(
                Step::new(2, "Manager Approval", StepType::Approval, Assignment::role("manager"))
                    .with_condition(Condition::new("priority", ConditionOperator::Equals, "high")),
            )
            .with_step(
                Step::new(3, "Executive Sign-off", StepType::SignOff, Assignment::role("admin"))
                    .with_condition(Condition::new("priority", ConditionOperator::Equals, "critical")),
            )
    }

    fn make_document(step: u32) -> DocumentSnapshot {
        let mut doc = DocumentSnapshot::new("blog", "doc-1").with_field("priority", "high");
        doc.workflow = WorkflowState::in_progress(StepOrder::new(step));
        doc
    }

    fn approve(step: u32, actor: Identity) -> ActionRequest {
        ActionRequest::new(
            "blog",
            "doc-1",
            StepOrder::new(step),
            WorkflowAction::Approve,
            actor,
        )
    }

    #[test]
    fn test_initial_transition() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let t = engine.initial_transition(&def).unwrap();

        assert_eq!(t.to, WorkflowState::in_progress(StepOrder::new(1)));
        assert_eq!(t.action, LogAction::Started);
        assert_eq!(t.step_name, "Review");
    }

    #[test]
    fn test_approve_advances_to_next_eligible_step() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(1);

        let t = engine
            .apply_action(&def, &doc, &approve(1, Identity::new("u-1", "reviewer")))
            .unwrap();

        // Step 2's condition (priority == high) holds, so it is entered
        // and awaits the manager's own approval.
        assert_eq!(t.to, WorkflowState::in_progress(StepOrder::new(2)));
        assert_eq!(t.action, LogAction::Approved);
    }

    #[test]
    fn test_approve_skips_ineligible_step_and_completes() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(2);

        // Step 3 wants priority == critical; this document is high, so
        // the workflow completes at step 2.
        let t = engine
            .apply_action(&def, &doc, &approve(2, Identity::new("u-2", "manager")))
            .unwrap();

        assert_eq!(t.to, WorkflowState::completed());
        assert_eq!(t.action, LogAction::Completed);
        assert_eq!(t.to.current_step, None);
    }

    #[test]
    fn test_approve_last_step_completes() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let mut doc = make_document(3);
        doc.fields
            .insert("priority".into(), "critical".into());

        let t = engine
            .apply_action(&def, &doc, &approve(3, Identity::new("u-3", "admin")))
            .unwrap();
        assert_eq!(t.to.status, WorkflowStatus::Completed);
    }

    #[test]
    fn test_order_gaps_are_skipped_transparently() {
        let engine = TransitionEngine::new();
        let def = WorkflowDefinition::new("Gappy", "blog")
            .with_id("wf-g")
            .with_step(Step::new(1, "First", StepType::Review, Assignment::role("reviewer")))
            .with_step(Step::new(10, "Last", StepType::Approval, Assignment::role("manager")));
        let doc = make_document(1);

        let t = engine
            .apply_action(&def, &doc, &approve(1, Identity::new("u-1", "reviewer")))
            .unwrap();
        assert_eq!(t.to, WorkflowState::in_progress(StepOrder::new(10)));
    }

    #[test]
    fn test_reject_is_unconditionally_terminal() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(1);

        let req = ActionRequest::new(
            "blog",
            "doc-1",
            StepOrder::new(1),
            WorkflowAction::Reject,
            Identity::new("u-1", "reviewer"),
        );
        let t = engine.apply_action(&def, &doc, &req).unwrap();

        assert_eq!(t.to, WorkflowState::rejected());
        assert_eq!(t.action, LogAction::Rejected);
    }

    #[test]
    fn test_comment_does_not_change_state() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(1);

        let req = ActionRequest::new(
            "blog",
            "doc-1",
            StepOrder::new(1),
            WorkflowAction::Comment,
            Identity::new("u-1", "reviewer"),
        )
        .with_comment("needs a second pass");
        let t = engine.apply_action(&def, &doc, &req).unwrap();

        assert!(!t.changes_state());
        assert_eq!(t.action, LogAction::Commented);
        assert_eq!(t.comment.as_deref(), Some("needs a second pass"));
    }

    #[test]
    fn test_empty_comment_is_invalid() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(1);

        for text in [None, Some(""), Some("   ")] {
            let mut req = ActionRequest::new(
                "blog",
                "doc-1",
                StepOrder::new(1),
                WorkflowAction::Comment,
                Identity::new("u-1", "reviewer"),
            );
            req.comment = text.map(String::from);
            let result = engine.apply_action(&def, &doc, &req);
            assert!(matches!(result, Err(WorkflowError::InvalidAction(_))));
        }
    }

    #[test]
    fn test_comment_only_step_refuses_decisions() {
        let engine = TransitionEngine::new();
        let def = WorkflowDefinition::new("Feedback", "blog")
            .with_id("wf-c")
            .with_step(Step::new(1, "Feedback", StepType::CommentOnly, Assignment::role("reviewer")));
        let doc = make_document(1);

        let result = engine.apply_action(&def, &doc, &approve(1, Identity::new("u-1", "reviewer")));
        assert!(matches!(result, Err(WorkflowError::InvalidAction(_))));

        let reject = ActionRequest::new(
            "blog",
            "doc-1",
            StepOrder::new(1),
            WorkflowAction::Reject,
            Identity::new("u-1", "reviewer"),
        );
        assert!(matches!(
            engine.apply_action(&def, &doc, &reject),
            Err(WorkflowError::InvalidAction(_))
        ));

        // Comments are still accepted, assignment permitting
        let comment = ActionRequest::new(
            "blog",
            "doc-1",
            StepOrder::new(1),
            WorkflowAction::Comment,
            Identity::new("u-1", "reviewer"),
        )
        .with_comment("noted");
        assert!(engine.apply_action(&def, &doc, &comment).is_ok());
    }

    #[test]
    fn test_unauthorized_actor_is_forbidden() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(1);

        let result = engine.apply_action(&def, &doc, &approve(1, Identity::new("u-9", "manager")));
        assert!(matches!(result, Err(WorkflowError::Forbidden { .. })));
    }

    #[test]
    fn test_terminal_document_refuses_actions() {
        let engine = TransitionEngine::new();
        let def = make_definition();

        for state in [WorkflowState::completed(), WorkflowState::rejected()] {
            let mut doc = make_document(1);
            doc.workflow = state;
            let result =
                engine.apply_action(&def, &doc, &approve(1, Identity::new("u-1", "reviewer")));
            assert!(matches!(result, Err(WorkflowError::WorkflowTerminated(_))));
        }
    }

    #[test]
    fn test_unknown_step_not_found() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let doc = make_document(1);

        let result = engine.apply_action(&def, &doc, &approve(7, Identity::new("u-1", "reviewer")));
        assert!(matches!(result, Err(WorkflowError::StepNotFound { .. })));
    }

    #[test]
    fn test_stale_step_replay_never_double_advances() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        // Document already advanced to step 2; a replay of the step-1
        // approve must be refused.
        let doc = make_document(2);

        let result = engine.apply_action(&def, &doc, &approve(1, Identity::new("u-1", "reviewer")));
        assert!(matches!(result, Err(WorkflowError::StepNotFound { .. })));
    }

    #[test]
    fn test_auto_advance_requires_assignee() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        // Step 2's condition holds, but the mutating actor is not the
        // manager, so nothing fires.
        let doc = make_document(2);
        assert!(engine
            .auto_advance(&def, &doc, &Identity::new("u-1", "reviewer"))
            .is_none());

        // The assignee's own mutation advances without an explicit action
        let t = engine
            .auto_advance(&def, &doc, &Identity::new("u-2", "manager"))
            .unwrap();
        assert_eq!(t.to, WorkflowState::completed());
    }

    #[test]
    fn test_auto_advance_requires_conditions() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let mut doc = make_document(2);
        doc.fields.insert("priority".into(), "low".into());

        // Conditions on the current step no longer hold
        assert!(engine
            .auto_advance(&def, &doc, &Identity::new("u-2", "manager"))
            .is_none());
    }

    #[test]
    fn test_auto_advance_ignores_terminal_documents() {
        let engine = TransitionEngine::new();
        let def = make_definition();
        let mut doc = make_document(1);
        doc.workflow = WorkflowState::completed();

        assert!(engine
            .auto_advance(&def, &doc, &Identity::new("u-1", "reviewer"))
            .is_none());
    }
}
