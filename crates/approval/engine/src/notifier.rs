//! Transition notifications
//!
//! Fire-and-forget: a notifier observes accepted transitions and may do
//! anything with them (log, email, webhook), but it can never fail a
//! transition or return an error into the engine.

use approval_types::{CollectionName, DocumentId, Identity, LogAction, WorkflowId};
use chrono::{DateTime, Utc};

/// A transition event handed to notifiers after the state is committed
#[derive(Clone, Debug)]
pub struct WorkflowEvent {
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
    pub document_id: DocumentId,
    pub collection: CollectionName,
    /// What happened (started, approved, rejected, ...)
    pub action: LogAction,
    /// Who caused it
    pub actor: Identity,
    pub timestamp: DateTime<Utc>,
}

/// Observer of accepted workflow transitions
pub trait Notifier: Send {
    fn notify(&self, event: &WorkflowEvent);
}

/// Notifier that emits a structured log line per event
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, event: &WorkflowEvent) {
        tracing::info!(
            workflow = %event.workflow_id,
            workflow_name = %event.workflow_name,
            collection = %event.collection,
            document = %event.document_id,
            action = %event.action,
            actor = %event.actor.id,
            "Workflow transition"
        );
    }
}

/// Notifier that discards everything, for tests
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &WorkflowEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test notifier that records the actions it saw
    #[derive(Clone, Default)]
    pub(crate) struct RecordingNotifier {
        pub seen: Arc<Mutex<Vec<LogAction>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: &WorkflowEvent) {
            self.seen.lock().unwrap().push(event.action);
        }
    }

    #[test]
    fn test_recording_notifier_sees_events() {
        let notifier = RecordingNotifier::default();
        let event = WorkflowEvent {
            workflow_id: WorkflowId::new("wf-1"),
            workflow_name: "Blog Approval".into(),
            document_id: DocumentId::new("doc-1"),
            collection: CollectionName::new("blog"),
            action: LogAction::Approved,
            actor: Identity::new("u-1", "reviewer"),
            timestamp: Utc::now(),
        };
        notifier.notify(&event);
        NullNotifier.notify(&event);
        TracingNotifier.notify(&event);

        assert_eq!(*notifier.seen.lock().unwrap(), vec![LogAction::Approved]);
    }
}
