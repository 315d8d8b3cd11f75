//! Concurrency-safe store for workflow definitions and their derived state.
//!
//! One map per access pattern, mirroring how the definitions are looked up:
//! workflows by name and by id, workflow-to-application mapping, the live
//! machine per workflow, and the catalog list backing paginated queries.
//! Constructed explicitly at startup and passed into the orchestration
//! service; there is no ambient static state.

use dashmap::DashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use crate::domain::application::AppId;
use crate::domain::machine::StateMachine;
use crate::domain::workflow::{Workflow, WorkflowId};
use crate::types::Content;

/// In-memory definition store.
pub struct DefinitionStore {
    workflows_by_name: DashMap<String, Workflow>,
    workflows_by_id: DashMap<WorkflowId, Workflow>,
    workflow_apps: DashMap<WorkflowId, AppId>,
    machines: DashMap<WorkflowId, StateMachine>,
    catalog: RwLock<Vec<Content>>,
    // Per-workflow-id critical sections. Ids are never reused, so entries for
    // deleted workflows are bounded and harmless.
    locks: DashMap<WorkflowId, Arc<Mutex<()>>>,
}

impl DefinitionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            workflows_by_name: DashMap::new(),
            workflows_by_id: DashMap::new(),
            workflow_apps: DashMap::new(),
            machines: DashMap::new(),
            catalog: RwLock::new(Vec::new()),
            locks: DashMap::new(),
        }
    }

    /// The mutex guarding cross-operation sequences for one workflow id.
    ///
    /// Action, update, and delete all acquire this before touching the
    /// machine or checking progress, so a load-mutate-persist sequence can
    /// never interleave with a delete of the same id.
    pub fn workflow_lock(&self, id: WorkflowId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Insert or replace a workflow under both its name and id keys.
    pub fn put_workflow(&self, workflow: Workflow) {
        self.workflows_by_name
            .insert(workflow.name.clone(), workflow.clone());
        self.workflows_by_id.insert(workflow.id, workflow);
    }

    /// Look up a workflow by name.
    pub fn workflow_by_name(&self, name: &str) -> Option<Workflow> {
        self.workflows_by_name.get(name).map(|w| w.clone())
    }

    /// Look up a workflow by id.
    pub fn workflow_by_id(&self, id: WorkflowId) -> Option<Workflow> {
        self.workflows_by_id.get(&id).map(|w| w.clone())
    }

    /// Drop the name index entry, used when a workflow is renamed.
    pub fn remove_workflow_name(&self, name: &str) {
        self.workflows_by_name.remove(name);
    }

    /// Record which application owns a workflow.
    pub fn put_mapping(&self, id: WorkflowId, app_id: AppId) {
        self.workflow_apps.insert(id, app_id);
    }

    /// The owning application of a workflow, if the mapping exists.
    pub fn app_id_of(&self, id: WorkflowId) -> Option<AppId> {
        self.workflow_apps.get(&id).map(|a| *a)
    }

    /// Install or replace the live machine for a workflow.
    pub fn put_machine(&self, id: WorkflowId, machine: StateMachine) {
        self.machines.insert(id, machine);
    }

    /// Run a closure against the workflow's machine.
    ///
    /// The map entry stays exclusively held for the duration of the closure,
    /// so a read-modify-write of the current state is one critical section.
    /// Returns `None` if no machine exists for the id.
    pub fn with_machine<R>(&self, id: WorkflowId, f: impl FnOnce(&mut StateMachine) -> R) -> Option<R> {
        self.machines.get_mut(&id).map(|mut entry| f(entry.value_mut()))
    }

    /// Whether the workflow's machine has advanced past its initial state.
    ///
    /// A workflow with no machine is not in progress.
    pub fn workflow_in_progress(&self, id: WorkflowId) -> bool {
        self.machines
            .get(&id)
            .map(|machine| machine.is_in_progress())
            .unwrap_or(false)
    }

    /// Append a catalog row.
    pub fn push_content(&self, content: Content) {
        self.catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(content);
    }

    /// Replace the catalog row with the same id, inserting if absent.
    ///
    /// Remove-then-insert runs under one write lock so concurrent updates
    /// cannot interleave into a duplicate or a lost entry.
    pub fn replace_content(&self, content: Content) {
        let mut catalog = self
            .catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        catalog.retain(|existing| existing.id != content.id);
        catalog.push(content);
    }

    /// Snapshot of all catalog rows.
    pub fn contents(&self) -> Vec<Content> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Remove every trace of a workflow as one logical unit: catalog row,
    /// application mapping, machine, and both definition records.
    pub fn purge_workflow(&self, id: WorkflowId, name: &str) {
        {
            let mut catalog = self
                .catalog
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            catalog.retain(|existing| existing.id != id);
        }
        self.workflow_apps.remove(&id);
        self.machines.remove(&id);
        self.workflows_by_name.remove(name);
        self.workflows_by_id.remove(&id);
    }
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}
