use std::collections::{HashMap, HashSet};

use crate::domain::application::Application;
use crate::domain::workflow::Workflow;
use crate::CoreError;

/// Reserved event name attempted once after every accepted transition.
pub const AUTO_EVENT: &str = "AUTO";

/// Runtime transition interpreter for one workflow instance.
///
/// A small adjacency-map state machine: states are the union of the
/// workflow's event endpoints, the initial and terminal states come from the
/// owning application, and each event contributes one labeled edge. The
/// current state is the only mutable piece.
#[derive(Debug, Clone)]
pub struct StateMachine {
    states: HashSet<String>,
    initial: String,
    terminal: String,
    /// Outgoing edges per source state: (event name, target state).
    transitions: HashMap<String, Vec<(String, String)>>,
    current: String,
}

impl StateMachine {
    /// Build a machine for a workflow owned by the given application.
    ///
    /// Upstream validation is assumed to have run; construction still fails
    /// if the application's begin or end state is not among the states the
    /// events actually reach.
    pub fn build(workflow: &Workflow, app: &Application) -> Result<Self, CoreError> {
        let mut states = HashSet::new();
        let mut transitions: HashMap<String, Vec<(String, String)>> = HashMap::new();

        for event in &workflow.events {
            states.insert(event.from_state.clone());
            states.insert(event.to_state.clone());
            transitions
                .entry(event.from_state.clone())
                .or_default()
                .push((event.name.clone(), event.to_state.clone()));
        }

        if !states.contains(&app.begin_state) {
            return Err(CoreError::MachineBuild(format!(
                "begin state {} is not reachable in workflow {}",
                app.begin_state, workflow.name
            )));
        }
        if !states.contains(&app.end_state) {
            return Err(CoreError::MachineBuild(format!(
                "end state {} is not reachable in workflow {}",
                app.end_state, workflow.name
            )));
        }

        Ok(Self {
            current: app.begin_state.clone(),
            initial: app.begin_state.clone(),
            terminal: app.end_state.clone(),
            states,
            transitions,
        })
    }

    /// Reset the machine to its initial state.
    ///
    /// Rebuild-and-restart on update discards in-flight progress, which is
    /// acceptable only because update and delete are blocked while the
    /// machine is in progress.
    pub fn start(&mut self) {
        self.current = self.initial.clone();
    }

    /// Attempt the named event from the current state.
    ///
    /// Follows the first outgoing edge with a matching label and returns
    /// true; if none exists the state is left unchanged and false is
    /// returned. There are no wildcard or default transitions.
    pub fn send_event(&mut self, name: &str) -> bool {
        let target = self
            .transitions
            .get(self.current.as_str())
            .and_then(|edges| edges.iter().find(|(label, _)| label == name))
            .map(|(_, to)| to.clone());

        match target {
            Some(to) => {
                self.current = to;
                true
            }
            None => false,
        }
    }

    /// Current state of the instance.
    pub fn current_state(&self) -> &str {
        &self.current
    }

    /// Initial state the machine starts in.
    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    /// Terminal state of the machine.
    pub fn terminal_state(&self) -> &str {
        &self.terminal
    }

    /// All states reachable by the machine's edges.
    pub fn states(&self) -> &HashSet<String> {
        &self.states
    }

    /// Whether the instance has advanced past its initial state.
    pub fn is_in_progress(&self) -> bool {
        self.current != self.initial
    }
}
