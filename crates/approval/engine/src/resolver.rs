//! Workflow resolver: finds the definition bound to a collection
//!
//! Definitions are registered once and treated as immutable; to change a
//! process, register a new definition and deactivate the old one. The
//! resolver does not own uniqueness enforcement — if the backing data
//! holds several active definitions for one collection it still answers
//! deterministically.

use approval_types::{
    CollectionName, WorkflowDefinition, WorkflowError, WorkflowId, WorkflowResult,
};
use std::collections::HashMap;

/// Registry and lookup of workflow definitions
#[derive(Clone, Debug, Default)]
pub struct WorkflowResolver {
    definitions: HashMap<WorkflowId, WorkflowDefinition>,
}

impl WorkflowResolver {
    /// Create a new empty resolver
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// Register a workflow definition
    ///
    /// Validates the definition before storing. Returns the definition ID.
    pub fn register(&mut self, definition: WorkflowDefinition) -> WorkflowResult<WorkflowId> {
        definition.validate()?;
        let id = definition.id.clone();
        tracing::info!(
            workflow = %id,
            collection = %definition.target_collection,
            "Workflow definition registered"
        );
        self.definitions.insert(id.clone(), definition);
        Ok(id)
    }

    /// Get a definition by ID
    pub fn get(&self, id: &WorkflowId) -> Option<&WorkflowDefinition> {
        self.definitions.get(id)
    }

    /// Resolve the single active definition governing a collection.
    ///
    /// Zero matches is `NoActiveWorkflow`. Multiple active matches are a
    /// data-consistency violation the resolver tolerates: it picks the
    /// lowest definition ID, a stable tie-break rather than an arbitrary
    /// choice.
    pub fn resolve(&self, collection: &CollectionName) -> WorkflowResult<&WorkflowDefinition> {
        let mut matches: Vec<&WorkflowDefinition> = self
            .definitions
            .values()
            .filter(|d| d.is_active && &d.target_collection == collection)
            .collect();

        if matches.len() > 1 {
            tracing::warn!(
                collection = %collection,
                count = matches.len(),
                "Multiple active workflows for collection, using lowest id"
            );
        }

        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
            .into_iter()
            .next()
            .ok_or_else(|| WorkflowError::NoActiveWorkflow(collection.clone()))
    }

    /// List all registered definitions
    pub fn list(&self) -> Vec<&WorkflowDefinition> {
        self.definitions.values().collect()
    }

    /// Total number of registered definitions
    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    /// Remove a definition
    pub fn remove(&mut self, id: &WorkflowId) -> Option<WorkflowDefinition> {
        let removed = self.definitions.remove(id);
        if removed.is_some() {
            tracing::info!(workflow = %id, "Workflow definition removed");
        }
        removed
    }
}
