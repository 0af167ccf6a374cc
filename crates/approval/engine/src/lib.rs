//! Approval workflow engine
//!
//! The engine advances business documents through ordered,
//! condition-gated approval steps. It resolves the workflow definition
//! bound to a document's collection, checks authorization and step
//! conditions before every transition, and records each accepted
//! transition exactly once in an append-only audit log.
//!
//! # Key Principle
//!
//! **The engine computes transitions; it never owns storage.** Documents
//! and definitions live behind collaborator traits. The engine reads a
//! snapshot, computes the next workflow state, writes back only the
//! workflow fields, then logs and notifies.
//!
//! # Architecture
//!
//! The [`ApprovalEngine`] facade composes specialized components:
//!
//! - [`WorkflowResolver`] — finds the single active definition per collection
//! - [`ConditionEvaluator`] — pure evaluation of step entry conditions
//! - [`AuthorizationChecker`] — pure per-step access decisions
//! - [`TransitionEngine`] — the state machine computing next states
//! - [`AuditLog`] — append-only transition records
//! - [`Notifier`] — fire-and-forget transition events
//! - [`EscalationMonitor`] — flags mutations that newly satisfy escalation rules
//!
//! # Example
//!
//! ```rust
//! use approval_engine::{ApprovalEngine, InMemoryAuditLog, InMemoryDocumentStore, NullNotifier};
//! use approval_types::*;
//!
//! let mut engine = ApprovalEngine::new(
//!     Box::new(InMemoryDocumentStore::new()),
//!     Box::new(InMemoryAuditLog::new()),
//!     Box::new(NullNotifier),
//! );
//!
//! let def = WorkflowDefinition::new("Blog Approval", "blog")
//!     .with_step(Step::new(1, "Review", StepType::Review, Assignment::role("reviewer")));
//! engine.register_workflow(def).unwrap();
//!
//! let actor = Identity::new("author-1", "editor");
//! let doc = DocumentSnapshot::new("blog", "post-1");
//! let state = engine.create_document(doc, &actor).unwrap();
//! assert_eq!(state.status, WorkflowStatus::InProgress);
//! ```

#![deny(unsafe_code)]

pub mod audit;
pub mod authorization;
pub mod condition;
pub mod engine;
pub mod escalation;
pub mod notifier;
pub mod resolver;
pub mod store;
pub mod transition;

// Re-export main types
pub use audit::{AuditLog, InMemoryAuditLog};
pub use authorization::AuthorizationChecker;
pub use condition::ConditionEvaluator;
pub use engine::{ApprovalEngine, StepView, WorkflowStatusView};
pub use escalation::{EscalationMonitor, EscalationRule};
pub use notifier::{Notifier, NullNotifier, TracingNotifier, WorkflowEvent};
pub use resolver::WorkflowResolver;
pub use store::{DocumentStore, InMemoryDocumentStore};
pub use transition::{Transition, TransitionEngine};
