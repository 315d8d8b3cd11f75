use std::sync::Arc;

use crate::domain::application::{AppId, Application};
use crate::domain::authorization::authorize;
use crate::domain::machine::{StateMachine, AUTO_EVENT};
use crate::domain::repository::{ApplicationRepository, Clock, IdGenerator};
use crate::domain::store::DefinitionStore;
use crate::domain::workflow::{has_cycle, Workflow, WorkflowId};
use crate::types::{Content, PagedData};
use crate::CoreError;

/// Orchestrates application and workflow use cases.
///
/// Composes the validators, the authorization check, the transition engine,
/// and the definition store. Every method returns a result value; no failure
/// escapes as a panic.
pub struct WorkflowService {
    applications: Arc<dyn ApplicationRepository>,
    store: Arc<DefinitionStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    default_creator: String,
}

impl WorkflowService {
    /// Create a service over the given collaborators.
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        store: Arc<DefinitionStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        default_creator: impl Into<String>,
    ) -> Self {
        Self {
            applications,
            store,
            ids,
            clock,
            default_creator: default_creator.into(),
        }
    }

    /// Register a new application.
    ///
    /// Validates the definition, derives the id from the name, and inserts
    /// it atomically; a second application with the same name is rejected.
    pub async fn create_app(&self, app: Application) -> Result<AppId, CoreError> {
        app.validate()?;

        let id = app.derived_id();
        let name = app.name.clone();
        if self.applications.insert_if_absent(id, app).await {
            tracing::info!(app_id = %id, name = %name, "application created");
            Ok(id)
        } else {
            Err(CoreError::DuplicateWorkflowName(name))
        }
    }

    /// Create a workflow against its owning application.
    ///
    /// Runs the full validation chain, then builds and starts the machine,
    /// allocates an id, and persists the workflow, machine, application
    /// mapping, and catalog row together.
    pub async fn create_workflow(&self, mut workflow: Workflow) -> Result<WorkflowId, CoreError> {
        if workflow.name.trim().is_empty() {
            return Err(CoreError::InvalidWorkflowName);
        }
        if self.store.workflow_by_name(&workflow.name).is_some() {
            return Err(CoreError::DuplicateWorkflowName(workflow.name));
        }

        workflow.validate_event_endpoints()?;

        let app = self
            .applications
            .get(workflow.app_id)
            .await
            .ok_or(CoreError::AppNotFound(workflow.app_id))?;

        workflow.validate_events_against(&app)?;

        if has_cycle(&workflow.events) {
            return Err(CoreError::IllegalStateTransition(format!(
                "workflow {} declares a cyclic event graph",
                workflow.name
            )));
        }

        let mut machine = StateMachine::build(&workflow, &app)?;
        machine.start();

        let id = WorkflowId(self.ids.next());
        workflow.id = id;

        self.store.put_machine(id, machine);
        self.store.put_mapping(id, workflow.app_id);
        self.store.push_content(Content {
            id,
            name: workflow.name.clone(),
            desc: workflow.desc.clone(),
            creator: self.default_creator.clone(),
            created_time: self.clock.now(),
        });
        let name = workflow.name.clone();
        self.store.put_workflow(workflow);

        tracing::info!(workflow_id = %id, name = %name, "workflow created");
        Ok(id)
    }

    /// Replace a workflow's definition.
    ///
    /// Allowed only while the instance has not advanced past its initial
    /// state. Rebuilds and restarts the machine for the new event set and
    /// re-persists the definition; the catalog row is left untouched.
    pub async fn update_workflow(&self, mut workflow: Workflow) -> Result<WorkflowId, CoreError> {
        let lock = self.store.workflow_lock(workflow.id);
        let _guard = lock.lock().await;

        let existing = self
            .store
            .workflow_by_id(workflow.id)
            .ok_or(CoreError::FlowNotFound(workflow.id))?;

        if workflow.id != existing.id {
            return Err(CoreError::InvalidInput(format!(
                "workflow id {} does not match the stored record",
                workflow.id
            )));
        }
        if self.store.workflow_in_progress(workflow.id) {
            return Err(CoreError::FlowInProgress(workflow.id));
        }
        if workflow.name != existing.name
            && self.store.workflow_by_name(&workflow.name).is_some()
        {
            return Err(CoreError::DuplicateWorkflowName(workflow.name));
        }

        let app_id = self
            .store
            .app_id_of(workflow.id)
            .ok_or(CoreError::FlowNotFound(workflow.id))?;
        workflow.app_id = app_id;

        let app = self
            .applications
            .get(app_id)
            .await
            .ok_or(CoreError::AppNotFound(app_id))?;

        let mut machine = StateMachine::build(&workflow, &app)?;
        machine.start();

        if workflow.name != existing.name {
            self.store.remove_workflow_name(&existing.name);
        }
        let id = workflow.id;
        self.store.put_machine(id, machine);
        self.store.put_workflow(workflow);

        tracing::info!(workflow_id = %id, "workflow updated");
        Ok(id)
    }

    /// Delete a workflow and all derived state.
    ///
    /// Allowed only while the instance has not advanced past its initial
    /// state.
    pub async fn delete_workflow(&self, id: WorkflowId) -> Result<WorkflowId, CoreError> {
        let lock = self.store.workflow_lock(id);
        let _guard = lock.lock().await;

        if self.store.app_id_of(id).is_none() {
            return Err(CoreError::FlowNotFound(id));
        }
        if self.store.workflow_in_progress(id) {
            return Err(CoreError::FlowInProgress(id));
        }

        let workflow = self
            .store
            .workflow_by_id(id)
            .ok_or(CoreError::FlowNotFound(id))?;
        self.store.purge_workflow(id, &workflow.name);

        tracing::info!(workflow_id = %id, name = %workflow.name, "workflow deleted");
        Ok(id)
    }

    /// Drive a workflow forward with a named action under a claimed role.
    ///
    /// Authorization is checked first; an accepted transition is followed by
    /// a single AUTO attempt whose outcome does not affect the reported
    /// result.
    pub async fn workflow_action(
        &self,
        id: WorkflowId,
        action: &str,
        role: &str,
    ) -> Result<WorkflowId, CoreError> {
        let lock = self.store.workflow_lock(id);
        let _guard = lock.lock().await;

        let workflow = self
            .store
            .workflow_by_id(id)
            .ok_or(CoreError::FlowNotFound(id))?;
        let app = self
            .applications
            .get(workflow.app_id)
            .await
            .ok_or(CoreError::AppNotFound(workflow.app_id))?;

        if !authorize(&app, &workflow, action, role) {
            tracing::debug!(workflow_id = %id, action, role, "action denied");
            return Err(CoreError::PermissionDenied {
                action: action.to_string(),
                role: role.to_string(),
            });
        }

        let accepted = self
            .store
            .with_machine(id, |machine| {
                let accepted = machine.send_event(action);
                if accepted {
                    // One automatic follow-up, never chained further.
                    machine.send_event(AUTO_EVENT);
                }
                accepted
            })
            .ok_or(CoreError::FlowNotFound(id))?;

        if accepted {
            tracing::info!(workflow_id = %id, action, role, "action applied");
            Ok(id)
        } else {
            Err(CoreError::IllegalStateTransition(format!(
                "no transition named {} from the current state",
                action
            )))
        }
    }

    /// Page through the workflow catalog, newest first.
    ///
    /// A zero page size selects the defaults (page 1, size 20); a
    /// non-positive page is normalized to 1; a page past the end is clamped
    /// to the last page. An empty catalog yields an empty page.
    pub async fn query_workflow(&self, page: i32, page_size: i32) -> PagedData {
        let (mut page, page_size) = if page_size <= 0 {
            (1, 20)
        } else {
            (page, page_size)
        };
        if page <= 0 {
            page = 1;
        }

        let mut contents = self.store.contents();
        // Stable sort: rows with equal timestamps keep insertion order.
        contents.sort_by(|a, b| b.created_time.cmp(&a.created_time));

        let total = contents.len();
        if total == 0 {
            return PagedData {
                page,
                size: page_size,
                total_page: 0,
                total: 0,
                content: Vec::new(),
            };
        }

        let size = page_size as usize;
        let total_page = total.div_ceil(size);
        let mut from = (page as usize - 1) * size;
        if from >= total {
            page = total_page as i32;
            from = (page as usize - 1) * size;
        }
        let to = (from + size).min(total);

        PagedData {
            page,
            size: page_size,
            total_page: total_page as i32,
            total: total as i32,
            content: contents[from..to].to_vec(),
        }
    }
}
