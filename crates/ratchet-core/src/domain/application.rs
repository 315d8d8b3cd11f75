use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::CoreError;

/// Value object: application id, derived deterministically from the name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(pub i32);

impl AppId {
    /// Derive the id for an application name.
    ///
    /// Uses the JVM string-hash formula masked to non-negative so the numeric
    /// shape stays compatible with callers of the previous system. Distinct
    /// names can in principle collide; duplicate detection is by id.
    pub fn from_name(name: &str) -> Self {
        AppId(jvm_string_hash(name) & 0x7FFF_FFFF)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// JVM-compatible string hash (`s[0]*31^(n-1) + s[1]*31^(n-2) + ... + s[n-1]`
/// over UTF-16 code units, wrapping i32 arithmetic).
pub fn jvm_string_hash(value: &str) -> i32 {
    let mut hash: i32 = 0;
    for unit in value.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(unit as i32);
    }
    hash
}

/// One named state in an application or workflow.
///
/// The code is the identifier used in transitions; uniqueness is implied by
/// application-level validation rather than enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Unique state code referenced by transitions.
    pub code: String,

    /// Human-readable state name.
    pub name: String,
}

/// One directed permission edge for a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auth {
    /// State the transition starts from.
    pub from_state: String,

    /// State the transition lands on.
    pub to_state: String,
}

impl Auth {
    /// Create a permission edge.
    pub fn new(from_state: impl Into<String>, to_state: impl Into<String>) -> Self {
        Self {
            from_state: from_state.into(),
            to_state: to_state.into(),
        }
    }
}

/// A named role and the transition edges it is permitted to drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role name.
    pub role: String,

    /// Permitted transition edges within the owning application.
    pub auth: Vec<Auth>,
}

/// A reusable definition of states, roles, and permitted role transitions.
///
/// Applications are created once and never updated or deleted; workflows are
/// instantiated against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Application name; identity is derived from it.
    pub name: String,

    /// Description.
    #[serde(default)]
    pub desc: String,

    /// Declared states.
    pub states: Vec<State>,

    /// Initial state for every workflow instantiated against this application.
    pub begin_state: String,

    /// Terminal state.
    pub end_state: String,

    /// Roles and their authorized transition edges.
    pub roles: Vec<Role>,
}

impl Application {
    /// The id derived from this application's name.
    pub fn derived_id(&self) -> AppId {
        AppId::from_name(&self.name)
    }

    /// Validate the application definition, returning the first violation.
    ///
    /// Checks, in order: at least three states; begin and end states present
    /// in the state list; then every role's auth edges against the graph
    /// rules: no self-loops, no reversal of an edge already recorded for the
    /// same role, and no edge landing back on the begin state.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.states.len() < 3 {
            return Err(CoreError::StateCountLessThanThree);
        }

        let codes: HashSet<&str> = self.states.iter().map(|s| s.code.as_str()).collect();
        if !codes.contains(self.begin_state.as_str()) || !codes.contains(self.end_state.as_str()) {
            return Err(CoreError::StartOrEndStateNotInList);
        }

        for role in &self.roles {
            // Last edge recorded per from-state; the reverse check reads it.
            let mut recorded: HashMap<&str, &str> = HashMap::new();
            for auth in &role.auth {
                if auth.from_state == auth.to_state {
                    return Err(CoreError::IllegalStateTransition(format!(
                        "role {} declares a self-loop on {}",
                        role.role, auth.from_state
                    )));
                }

                if recorded
                    .get(auth.to_state.as_str())
                    .is_some_and(|&to| to == auth.from_state)
                {
                    return Err(CoreError::IllegalStateTransition(format!(
                        "role {} declares {} -> {} reversing an earlier edge",
                        role.role, auth.from_state, auth.to_state
                    )));
                }

                if auth.to_state == self.begin_state {
                    return Err(CoreError::IllegalStateTransition(format!(
                        "role {} declares a transition back to the begin state {}",
                        role.role, self.begin_state
                    )));
                }

                recorded.insert(&auth.from_state, &auth.to_state);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(code: &str) -> State {
        State {
            code: code.to_string(),
            name: code.to_lowercase(),
        }
    }

    fn review_app() -> Application {
        Application {
            name: "document-review".to_string(),
            desc: "document review pipeline".to_string(),
            states: vec![state("DRAFT"), state("REVIEW"), state("DONE")],
            begin_state: "DRAFT".to_string(),
            end_state: "DONE".to_string(),
            roles: vec![Role {
                role: "author".to_string(),
                auth: vec![Auth::new("DRAFT", "REVIEW")],
            }],
        }
    }

    #[test]
    fn test_jvm_string_hash_known_values() {
        // Reference values from the JVM definition of String.hashCode.
        assert_eq!(jvm_string_hash(""), 0);
        assert_eq!(jvm_string_hash("a"), 97);
        assert_eq!(jvm_string_hash("abc"), 96354);
    }

    #[test]
    fn test_app_id_is_deterministic_and_non_negative() {
        let first = AppId::from_name("document-review");
        let second = AppId::from_name("document-review");
        assert_eq!(first, second);
        assert!(first.0 >= 0);

        // A name whose raw hash is negative still masks to non-negative.
        let hashed = jvm_string_hash("polygenelubricants");
        assert!(hashed < 0);
        assert!(AppId::from_name("polygenelubricants").0 >= 0);
    }

    #[test]
    fn test_validate_accepts_well_formed_application() {
        assert!(review_app().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_fewer_than_three_states() {
        let mut app = review_app();
        app.states.truncate(2);
        assert_eq!(app.validate(), Err(CoreError::StateCountLessThanThree));
    }

    #[test]
    fn test_validate_rejects_begin_or_end_outside_state_list() {
        let mut app = review_app();
        app.begin_state = "MISSING".to_string();
        assert_eq!(app.validate(), Err(CoreError::StartOrEndStateNotInList));

        let mut app = review_app();
        app.end_state = "MISSING".to_string();
        assert_eq!(app.validate(), Err(CoreError::StartOrEndStateNotInList));
    }

    #[test]
    fn test_validate_rejects_self_loop() {
        let mut app = review_app();
        app.roles[0].auth.push(Auth::new("REVIEW", "REVIEW"));
        let err = app.validate().unwrap_err();
        assert!(matches!(err, CoreError::IllegalStateTransition(_)));
    }

    #[test]
    fn test_validate_rejects_reverse_pair_within_role() {
        let mut app = review_app();
        app.roles[0].auth = vec![Auth::new("DRAFT", "REVIEW"), Auth::new("REVIEW", "DRAFT")];
        let err = app.validate().unwrap_err();
        assert!(matches!(err, CoreError::IllegalStateTransition(_)));
    }

    #[test]
    fn test_reverse_pair_allowed_across_roles() {
        // The reverse-pair rule is scoped to a single role's auth list, but a
        // REVIEW -> DRAFT edge still trips the begin-state rule, so route the
        // second role through a different pair.
        let mut app = review_app();
        app.states.push(state("ARCHIVE"));
        app.roles[0].auth.push(Auth::new("REVIEW", "ARCHIVE"));
        app.roles.push(Role {
            role: "auditor".to_string(),
            auth: vec![Auth::new("ARCHIVE", "REVIEW")],
        });
        assert!(app.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_edge_back_to_begin_state() {
        let mut app = review_app();
        app.roles[0].auth.push(Auth::new("REVIEW", "DRAFT"));
        let err = app.validate().unwrap_err();
        assert!(matches!(err, CoreError::IllegalStateTransition(_)));
    }

    #[test]
    fn test_reverse_check_reads_latest_edge_per_from_state() {
        // Recording overwrites per from-state: after REVIEW -> DONE the
        // earlier REVIEW -> APPROVED edge is forgotten, so APPROVED -> REVIEW
        // does not register as a reversal.
        let mut app = review_app();
        app.states.push(state("APPROVED"));
        app.roles[0].auth = vec![
            Auth::new("REVIEW", "APPROVED"),
            Auth::new("REVIEW", "DONE"),
            Auth::new("APPROVED", "REVIEW"),
        ];
        assert!(app.validate().is_ok());
    }

    #[test]
    fn test_auth_equality_is_field_wise() {
        assert_eq!(Auth::new("A", "B"), Auth::new("A", "B"));
        assert_ne!(Auth::new("A", "B"), Auth::new("B", "A"));

        let mut set = HashSet::new();
        set.insert(Auth::new("A", "B"));
        assert!(set.contains(&Auth::new("A", "B")));
    }

    #[test]
    fn test_application_wire_field_names() {
        let json = serde_json::to_value(review_app()).unwrap();
        assert!(json["beginState"].is_string());
        assert!(json["endState"].is_string());
        assert!(json["roles"][0]["auth"][0]["fromState"].is_string());
    }
}
