use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::domain::application::{AppId, Application, Auth, State};
use crate::CoreError;

/// Value object: workflow id, allocated from a monotonic process-wide counter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WorkflowId(pub i64);

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, role-scoped directed transition declared on a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Action name that triggers the transition.
    pub name: String,

    /// Source state.
    pub from_state: String,

    /// Target state.
    pub to_state: String,

    /// Role permitted to trigger the transition.
    pub role: String,
}

/// One instantiable process definition scoped to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Id of the owning application.
    pub app_id: AppId,

    /// Workflow id; assigned at creation, ignored on create requests.
    #[serde(default)]
    pub id: WorkflowId,

    /// Workflow name, unique across all workflows.
    pub name: String,

    /// Description.
    #[serde(default)]
    pub desc: String,

    /// State subset this workflow operates over.
    pub states: Vec<State>,

    /// Declared transitions.
    pub events: Vec<Event>,
}

impl Workflow {
    /// Codes of the workflow's declared states.
    pub fn state_codes(&self) -> HashSet<&str> {
        self.states.iter().map(|s| s.code.as_str()).collect()
    }

    /// Check that every event's endpoints are declared workflow states.
    pub fn validate_event_endpoints(&self) -> Result<(), CoreError> {
        let codes = self.state_codes();
        for event in &self.events {
            if !codes.contains(event.from_state.as_str()) || !codes.contains(event.to_state.as_str())
            {
                return Err(CoreError::IllegalStateTransition(format!(
                    "event {} uses a state outside the workflow state list",
                    event.name
                )));
            }
        }
        Ok(())
    }

    /// Check every event against the owning application's authorized edges.
    ///
    /// The authorized set is the union of all roles' auth edges, restricted to
    /// pairs whose endpoints both appear in this workflow's state list. A
    /// single unmatched event fails the whole validation.
    pub fn validate_events_against(&self, app: &Application) -> Result<(), CoreError> {
        let codes = self.state_codes();
        let authorized: HashSet<&Auth> = app
            .roles
            .iter()
            .flat_map(|role| role.auth.iter())
            .filter(|auth| {
                codes.contains(auth.from_state.as_str()) && codes.contains(auth.to_state.as_str())
            })
            .collect();

        for event in &self.events {
            let edge = Auth::new(event.from_state.clone(), event.to_state.clone());
            if !authorized.contains(&edge) {
                return Err(CoreError::IllegalStateTransition(format!(
                    "event {} ({} -> {}) is not authorized by application {}",
                    event.name, event.from_state, event.to_state, app.name
                )));
            }
        }
        Ok(())
    }
}

/// Detect a cycle in the directed graph formed by the events.
///
/// Builds an adjacency list keyed by source state and runs a depth-first
/// search from every key, tracking the current recursion stack; revisiting a
/// state already on the stack is a cycle. Disconnected subgraphs are each
/// visited; states fully explored by an earlier start are skipped.
pub fn has_cycle(events: &[Event]) -> bool {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();
    for event in events {
        graph
            .entry(event.from_state.as_str())
            .or_default()
            .push(event.to_state.as_str());
    }

    let mut visited = HashSet::new();
    let mut stack = HashSet::new();
    for &state in graph.keys() {
        if dfs_finds_cycle(state, &graph, &mut visited, &mut stack) {
            return true;
        }
    }
    false
}

fn dfs_finds_cycle<'a>(
    state: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut HashSet<&'a str>,
) -> bool {
    if stack.contains(state) {
        return true;
    }
    if visited.contains(state) {
        return false;
    }
    visited.insert(state);
    stack.insert(state);
    if let Some(neighbors) = graph.get(state) {
        for &neighbor in neighbors {
            if dfs_finds_cycle(neighbor, graph, visited, stack) {
                return true;
            }
        }
    }
    stack.remove(state);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application::{Auth, Role};

    fn state(code: &str) -> State {
        State {
            code: code.to_string(),
            name: code.to_lowercase(),
        }
    }

    fn event(name: &str, from: &str, to: &str, role: &str) -> Event {
        Event {
            name: name.to_string(),
            from_state: from.to_string(),
            to_state: to.to_string(),
            role: role.to_string(),
        }
    }

    fn review_app() -> Application {
        Application {
            name: "document-review".to_string(),
            desc: String::new(),
            states: vec![state("DRAFT"), state("REVIEW"), state("DONE")],
            begin_state: "DRAFT".to_string(),
            end_state: "DONE".to_string(),
            roles: vec![
                Role {
                    role: "author".to_string(),
                    auth: vec![Auth::new("DRAFT", "REVIEW")],
                },
                Role {
                    role: "reviewer".to_string(),
                    auth: vec![Auth::new("REVIEW", "DONE")],
                },
            ],
        }
    }

    fn review_workflow() -> Workflow {
        Workflow {
            app_id: AppId::from_name("document-review"),
            id: WorkflowId(1),
            name: "article-42".to_string(),
            desc: String::new(),
            states: vec![state("DRAFT"), state("REVIEW"), state("DONE")],
            events: vec![
                event("submit", "DRAFT", "REVIEW", "author"),
                event("approve", "REVIEW", "DONE", "reviewer"),
            ],
        }
    }

    #[test]
    fn test_event_endpoints_must_be_declared() {
        let workflow = review_workflow();
        assert!(workflow.validate_event_endpoints().is_ok());

        let mut workflow = review_workflow();
        workflow.events.push(event("escalate", "REVIEW", "LEGAL", "reviewer"));
        let err = workflow.validate_event_endpoints().unwrap_err();
        assert!(matches!(err, CoreError::IllegalStateTransition(_)));
    }

    #[test]
    fn test_events_must_match_authorized_edges() {
        let app = review_app();
        assert!(review_workflow().validate_events_against(&app).is_ok());

        // DONE -> REVIEW is declared by no role.
        let mut workflow = review_workflow();
        workflow.events.push(event("reopen", "DONE", "REVIEW", "reviewer"));
        let err = workflow.validate_events_against(&app).unwrap_err();
        assert!(matches!(err, CoreError::IllegalStateTransition(_)));
    }

    #[test]
    fn test_authorized_set_is_restricted_to_workflow_states() {
        // The application authorizes REVIEW -> DONE, but this workflow does
        // not declare DONE, so the pair is filtered out of the authorized set
        // and the event fails even though the app-level edge exists.
        let app = review_app();
        let mut workflow = review_workflow();
        workflow.states = vec![state("DRAFT"), state("REVIEW"), state("EXTRA")];
        workflow.events = vec![event("approve", "REVIEW", "REVIEW", "reviewer")];
        assert!(workflow.validate_events_against(&app).is_err());
    }

    #[test]
    fn test_authorization_union_spans_roles() {
        // An event may reuse an edge authorized for a different role; only
        // the pair membership matters here.
        let app = review_app();
        let mut workflow = review_workflow();
        workflow.events = vec![event("submit", "DRAFT", "REVIEW", "reviewer")];
        assert!(workflow.validate_events_against(&app).is_ok());
    }

    #[test]
    fn test_has_cycle_linear_chain() {
        let events = vec![
            event("a", "A", "B", "r"),
            event("b", "B", "C", "r"),
            event("c", "C", "D", "r"),
        ];
        assert!(!has_cycle(&events));
    }

    #[test]
    fn test_has_cycle_three_node_loop() {
        let events = vec![
            event("a", "A", "B", "r"),
            event("b", "B", "C", "r"),
            event("c", "C", "A", "r"),
        ];
        assert!(has_cycle(&events));
    }

    #[test]
    fn test_has_cycle_self_loop() {
        let events = vec![event("a", "A", "A", "r")];
        assert!(has_cycle(&events));
    }

    #[test]
    fn test_has_cycle_diamond_is_acyclic() {
        let events = vec![
            event("a", "A", "B", "r"),
            event("b", "A", "C", "r"),
            event("c", "B", "D", "r"),
            event("d", "C", "D", "r"),
        ];
        assert!(!has_cycle(&events));
    }

    #[test]
    fn test_has_cycle_in_disconnected_component() {
        let events = vec![
            event("a", "A", "B", "r"),
            event("x", "X", "Y", "r"),
            event("y", "Y", "X", "r"),
        ];
        assert!(has_cycle(&events));
    }

    #[test]
    fn test_has_cycle_empty_graph() {
        assert!(!has_cycle(&[]));
    }

    #[test]
    fn test_workflow_wire_field_names() {
        let json = serde_json::to_value(review_workflow()).unwrap();
        assert!(json["appId"].is_number());
        assert_eq!(json["events"][0]["fromState"], "DRAFT");
    }

    #[test]
    fn test_workflow_id_defaults_on_create_requests() {
        let raw = r#"{
            "appId": 123,
            "name": "article-42",
            "states": [{"code": "DRAFT", "name": "draft"}],
            "events": []
        }"#;
        let workflow: Workflow = serde_json::from_str(raw).unwrap();
        assert_eq!(workflow.id, WorkflowId(0));
        assert_eq!(workflow.desc, "");
    }
}
