//! Append-only audit log of workflow transitions
//!
//! Every accepted transition is recorded exactly once. Entries are
//! immutable after append; there is deliberately no update API. The
//! only mutation beyond append is an admin-gated purge for
//! administrative cleanup of a whole document's history.

use approval_types::{
    CollectionName, DocumentId, Identity, WorkflowError, WorkflowLogEntry, WorkflowResult,
};

/// Sink for workflow transition records
///
/// Implementations must be append-only. A failed append surfaces as
/// `LogWriteFailed`; the caller decides whether that aborts anything
/// (the engine does not roll back a committed transition over it).
pub trait AuditLog: Send {
    /// Append one transition record
    fn append(&mut self, entry: WorkflowLogEntry) -> WorkflowResult<()>;

    /// All entries for a document, most recent first
    fn entries_for(&self, collection: &CollectionName, id: &DocumentId) -> Vec<WorkflowLogEntry>;

    /// Remove a document's entire history. Admin-only.
    fn purge_document(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        actor: &Identity,
    ) -> WorkflowResult<usize>;
}

/// In-memory audit log for tests and single-process deployments
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Vec<WorkflowLogEntry>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Total number of entries across all documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&mut self, mut entry: WorkflowLogEntry) -> WorkflowResult<()> {
        // Timestamps within one document's history never go backwards,
        // even if the wall clock does.
        if let Some(last) = self
            .entries
            .iter()
            .rev()
            .find(|e| e.collection == entry.collection && e.document_id == entry.document_id)
        {
            if entry.created_at < last.created_at {
                entry.created_at = last.created_at;
            }
        }
        tracing::debug!(
            document = %entry.document_id,
            action = %entry.action,
            step = %entry.step_id,
            "Audit entry appended"
        );
        self.entries.push(entry);
        Ok(())
    }

    fn entries_for(&self, collection: &CollectionName, id: &DocumentId) -> Vec<WorkflowLogEntry> {
        let mut found: Vec<WorkflowLogEntry> = self
            .entries
            .iter()
            .filter(|e| &e.collection == collection && &e.document_id == id)
            .cloned()
            .collect();
        found.reverse();
        found
    }

    fn purge_document(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        actor: &Identity,
    ) -> WorkflowResult<usize> {
        if !actor.is_admin() {
            return Err(WorkflowError::AdminRequired(actor.id.clone()));
        }
        let before = self.entries.len();
        self.entries
            .retain(|e| !(&e.collection == collection && &e.document_id == id));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::info!(
                collection = %collection,
                document = %id,
                removed,
                "Audit history purged"
            );
        }
        Ok(removed)
    }
}
