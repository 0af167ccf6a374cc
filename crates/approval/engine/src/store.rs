//! Document collaborator: where documents actually live
//!
//! The engine never owns document storage. It reads a snapshot, computes
//! the next workflow state, and writes back ONLY the workflow fields —
//! business fields are the calling application's to mutate.

use approval_types::{
    CollectionName, DocumentId, DocumentSnapshot, WorkflowError, WorkflowResult, WorkflowState,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Backing storage for documents under workflow control
///
/// Implementations must make the engine's read-modify-write of a single
/// document atomic with respect to concurrent actions on that document;
/// the engine itself assumes snapshots do not change under it.
pub trait DocumentStore: Send {
    /// Load a document snapshot
    fn load(&self, collection: &CollectionName, id: &DocumentId)
        -> WorkflowResult<DocumentSnapshot>;

    /// Insert a new document
    fn insert(&mut self, document: DocumentSnapshot) -> WorkflowResult<()>;

    /// Overwrite a document's workflow fields, leaving business fields alone
    fn write_workflow_state(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        state: &WorkflowState,
    ) -> WorkflowResult<()>;

    /// Overwrite a document's business fields, leaving workflow fields alone
    fn write_fields(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> WorkflowResult<()>;
}

/// In-memory store for tests and single-process deployments
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: HashMap<(CollectionName, DocumentId), DocumentSnapshot>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn get_mut(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> WorkflowResult<&mut DocumentSnapshot> {
        self.documents
            .get_mut(&(collection.clone(), id.clone()))
            .ok_or_else(|| WorkflowError::DocumentNotFound {
                collection: collection.clone(),
                id: id.clone(),
            })
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn load(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> WorkflowResult<DocumentSnapshot> {
        self.documents
            .get(&(collection.clone(), id.clone()))
            .cloned()
            .ok_or_else(|| WorkflowError::DocumentNotFound {
                collection: collection.clone(),
                id: id.clone(),
            })
    }

    fn insert(&mut self, document: DocumentSnapshot) -> WorkflowResult<()> {
        let key = (document.collection.clone(), document.id.clone());
        self.documents.insert(key, document);
        Ok(())
    }

    fn write_workflow_state(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        state: &WorkflowState,
    ) -> WorkflowResult<()> {
        let doc = self.get_mut(collection, id)?;
        doc.workflow = state.clone();
        Ok(())
    }

    fn write_fields(
        &mut self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: Map<String, Value>,
    ) -> WorkflowResult<()> {
        let doc = self.get_mut(collection, id)?;
        doc.fields = fields;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approval_types::StepOrder;

    #[test]
    fn test_insert_and_load() {
        let mut store = InMemoryDocumentStore::new();
        let doc = DocumentSnapshot::new("blog", "doc-1").with_field("priority", "high");
        store.insert(doc).unwrap();

        let loaded = store
            .load(&CollectionName::new("blog"), &DocumentId::new("doc-1"))
            .unwrap();
        assert_eq!(loaded.field("priority"), Some(&Value::from("high")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_missing_document() {
        let store = InMemoryDocumentStore::new();
        let result = store.load(&CollectionName::new("blog"), &DocumentId::new("nope"));
        assert!(matches!(result, Err(WorkflowError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_workflow_write_leaves_business_fields() {
        let mut store = InMemoryDocumentStore::new();
        store
            .insert(DocumentSnapshot::new("blog", "doc-1").with_field("title", "Draft"))
            .unwrap();

        let state = WorkflowState::in_progress(StepOrder::new(1));
        store
            .write_workflow_state(&CollectionName::new("blog"), &DocumentId::new("doc-1"), &state)
            .unwrap();

        let loaded = store
            .load(&CollectionName::new("blog"), &DocumentId::new("doc-1"))
            .unwrap();
        assert_eq!(loaded.workflow, state);
        assert_eq!(loaded.field("title"), Some(&Value::from("Draft")));
    }

    #[test]
    fn test_field_write_leaves_workflow_state() {
        let mut store = InMemoryDocumentStore::new();
        let mut doc = DocumentSnapshot::new("blog", "doc-1");
        doc.workflow = WorkflowState::in_progress(StepOrder::new(2));
        store.insert(doc).unwrap();

        let mut fields = Map::new();
        fields.insert("priority".into(), "critical".into());
        store
            .write_fields(&CollectionName::new("blog"), &DocumentId::new("doc-1"), fields)
            .unwrap();

        let loaded = store
            .load(&CollectionName::new("blog"), &DocumentId::new("doc-1"))
            .unwrap();
        assert_eq!(loaded.workflow.current_step, Some(StepOrder::new(2)));
        assert_eq!(loaded.field("priority"), Some(&Value::from("critical")));
    }
}
