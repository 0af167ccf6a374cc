//! The `ApprovalEngine` facade
//!
//! Owns the resolver and state machine, and holds the storage, audit,
//! and notification collaborators behind trait objects supplied at
//! construction. Every operation follows the same shape: resolve the
//! definition, load the snapshot, compute, persist, then log and notify
//! best-effort — a failed audit append or notification never rolls back
//! a committed transition.

use crate::{
    AuditLog, DocumentStore, EscalationMonitor, EscalationRule, Notifier, Transition,
    TransitionEngine, WorkflowEvent, WorkflowResolver,
};
use approval_types::{
    ActionRequest, Assignment, CollectionName, DocumentId, DocumentSnapshot, Identity, LogAction,
    StepOrder, StepType, WorkflowDefinition, WorkflowError, WorkflowId, WorkflowLogEntry,
    WorkflowResult, WorkflowState, WorkflowStatus,
};
use chrono::Utc;
use serde_json::{Map, Value};

// ── Status View ──────────────────────────────────────────────────────

/// A step as presented in a status query
#[derive(Clone, Debug, PartialEq)]
pub struct StepView {
    pub order: StepOrder,
    pub name: String,
    pub step_type: StepType,
    pub assigned_to: Assignment,
    pub is_current: bool,
}

/// Complete answer to a document status query
#[derive(Clone, Debug)]
pub struct WorkflowStatusView {
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
    pub document_id: DocumentId,
    pub collection: CollectionName,
    pub status: WorkflowStatus,
    pub current_step: Option<StepView>,
    /// All steps of the definition, in order
    pub steps: Vec<StepView>,
    /// Full audit history, most recent first
    pub log: Vec<WorkflowLogEntry>,
}

// ── Engine ───────────────────────────────────────────────────────────

/// Facade composing the workflow components behind a small API
pub struct ApprovalEngine {
    resolver: WorkflowResolver,
    transitions: TransitionEngine,
    escalations: EscalationMonitor,
    store: Box<dyn DocumentStore>,
    audit: Box<dyn AuditLog>,
    notifier: Box<dyn Notifier>,
}

impl ApprovalEngine {
    pub fn new(
        store: Box<dyn DocumentStore>,
        audit: Box<dyn AuditLog>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            resolver: WorkflowResolver::new(),
            transitions: TransitionEngine::new(),
            escalations: EscalationMonitor::new(),
            store,
            audit,
            notifier,
        }
    }

    /// Validate and register a workflow definition
    pub fn register_workflow(&mut self, definition: WorkflowDefinition) -> WorkflowResult<WorkflowId> {
        self.resolver.register(definition)
    }

    pub fn add_escalation_rule(&mut self, rule: EscalationRule) {
        self.escalations.add_rule(rule);
    }

    /// Read-only access to the registered definitions
    pub fn resolver(&self) -> &WorkflowResolver {
        &self.resolver
    }

    /// Read-only access to the audit log
    pub fn audit(&self) -> &dyn AuditLog {
        self.audit.as_ref()
    }

    /// Store a new document, initializing its workflow if one is bound.
    ///
    /// With no active workflow for the collection the document is stored
    /// inert: status `NotStarted`, no current step, no audit entry. With
    /// one, the document enters the lowest-order step and exactly one
    /// `Started` entry is recorded.
    pub fn create_document(
        &mut self,
        mut document: DocumentSnapshot,
        actor: &Identity,
    ) -> WorkflowResult<WorkflowState> {
        let definition = match self.resolver.resolve(&document.collection) {
            Ok(def) => def.clone(),
            Err(WorkflowError::NoActiveWorkflow(_)) => {
                document.workflow = WorkflowState::not_started();
                let state = document.workflow.clone();
                self.store.insert(document)?;
                return Ok(state);
            }
            Err(e) => return Err(e),
        };

        let transition = self.transitions.initial_transition(&definition)?;
        document.workflow = transition.to.clone();
        let state = document.workflow.clone();
        let id = document.id.clone();
        let fields = document.fields.clone();
        self.store.insert(document)?;
        self.record(&definition, &id, &transition, actor);
        self.record_escalations(&definition, &id, &state, None, &fields, actor);
        Ok(state)
    }

    /// Apply an actor-driven action to a document's current step.
    ///
    /// All validation errors abort before any write. The audit append
    /// and notification run after the state is committed.
    pub fn submit_action(&mut self, request: &ActionRequest) -> WorkflowResult<WorkflowState> {
        let definition = self.resolver.resolve(&request.collection)?.clone();
        let document = self.store.load(&request.collection, &request.document_id)?;

        let transition = self
            .transitions
            .apply_action(&definition, &document, request)?;

        if transition.changes_state() {
            self.store.write_workflow_state(
                &request.collection,
                &request.document_id,
                &transition.to,
            )?;
        }
        self.record(&definition, &request.document_id, &transition, &request.actor);
        Ok(transition.to)
    }

    /// Apply a caller's field mutation, then run the condition-driven
    /// follow-ups: at most one auto-advance, plus escalation rules that
    /// the mutation newly satisfies.
    pub fn update_document(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: Map<String, Value>,
        actor: &Identity,
    ) -> WorkflowResult<WorkflowState> {
        let previous = self.store.load(collection, id)?;
        self.store.write_fields(collection, id, fields.clone())?;

        let definition = match self.resolver.resolve(collection) {
            Ok(def) => def.clone(),
            // Inert documents take field updates with no follow-ups
            Err(WorkflowError::NoActiveWorkflow(_)) => return Ok(previous.workflow),
            Err(e) => return Err(e),
        };

        let mut updated = previous.clone();
        updated.fields = fields;

        self.record_escalations(
            &definition,
            id,
            &updated.workflow,
            Some(&previous.fields),
            &updated.fields,
            actor,
        );

        if let Some(transition) = self.transitions.auto_advance(&definition, &updated, actor) {
            self.store.write_workflow_state(collection, id, &transition.to)?;
            self.record(&definition, id, &transition, actor);
            return Ok(transition.to);
        }
        Ok(updated.workflow)
    }

    /// Answer a status query: current state, step list, and full history
    pub fn status(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> WorkflowResult<WorkflowStatusView> {
        let definition = self.resolver.resolve(collection)?;
        let document = self.store.load(collection, id)?;

        let steps: Vec<StepView> = definition
            .steps
            .iter()
            .map(|s| StepView {
                order: s.order,
                name: s.name.clone(),
                step_type: s.step_type,
                assigned_to: s.assigned_to.clone(),
                is_current: document.workflow.current_step == Some(s.order),
            })
            .collect();
        let current_step = steps.iter().find(|s| s.is_current).cloned();

        Ok(WorkflowStatusView {
            workflow_id: definition.id.clone(),
            workflow_name: definition.name.clone(),
            document_id: document.id.clone(),
            collection: collection.clone(),
            status: document.workflow.status,
            current_step,
            steps,
            log: self.audit.entries_for(collection, id),
        })
    }

    // ── Internal helpers ─────────────────────────────────────────────

    /// Append the transition's audit entry and emit its event.
    ///
    /// Best-effort by contract: the transition is already committed, so
    /// an append failure is logged and swallowed.
    fn record(
        &mut self,
        definition: &WorkflowDefinition,
        id: &DocumentId,
        transition: &Transition,
        actor: &Identity,
    ) {
        let mut entry = WorkflowLogEntry::new(
            definition.id.clone(),
            id.clone(),
            definition.target_collection.clone(),
            transition.step.as_text(),
            transition.step_name.clone(),
            transition.action,
            actor.id.clone(),
        );
        if let Some(comment) = &transition.comment {
            entry = entry.with_comment(comment.clone());
        }
        if let Err(e) = self.audit.append(entry) {
            tracing::warn!(
                document = %id,
                action = %transition.action,
                error = %e,
                "Audit append failed; transition stands"
            );
        }

        self.notifier.notify(&WorkflowEvent {
            workflow_id: definition.id.clone(),
            workflow_name: definition.name.clone(),
            document_id: id.clone(),
            collection: definition.target_collection.clone(),
            action: transition.action,
            actor: actor.clone(),
            timestamp: Utc::now(),
        });
    }

    /// Append one `Escalated` entry per rule the mutation newly trips
    fn record_escalations(
        &mut self,
        definition: &WorkflowDefinition,
        id: &DocumentId,
        state: &WorkflowState,
        previous: Option<&Map<String, Value>>,
        updated: &Map<String, Value>,
        actor: &Identity,
    ) {
        let fired: Vec<EscalationRule> = self
            .escalations
            .fired(&definition.target_collection, previous, updated)
            .into_iter()
            .cloned()
            .collect();

        for rule in fired {
            tracing::warn!(
                collection = %rule.collection,
                document = %id,
                label = %rule.label,
                "Escalation rule fired"
            );
            let (step_id, step_name) = match state.current_step {
                Some(order) => {
                    let name = definition
                        .step_by_order(order)
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    (order.as_text(), name)
                }
                None => ("-".to_string(), String::new()),
            };
            let entry = WorkflowLogEntry::new(
                definition.id.clone(),
                id.clone(),
                definition.target_collection.clone(),
                step_id,
                step_name,
                LogAction::Escalated,
                actor.id.clone(),
            )
            .with_comment(rule.label.clone());
            if let Err(e) = self.audit.append(entry) {
                tracing::warn!(document = %id, error = %e, "Audit append failed for escalation");
            }
        }
    }
}
