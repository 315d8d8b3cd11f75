//! Role authorization for workflow actions.
//!
//! The check is deliberately state-independent: it asks whether *some* event
//! with the given name is declared for the role and backed by one of the
//! role's authorized edges, never what the instance's current state is. The
//! transition engine enforces positional legality separately.

use crate::domain::application::Application;
use crate::domain::workflow::Workflow;

/// Decide whether `role` may trigger `action` on the given workflow.
///
/// An action whose name equals the claimed role is authorized
/// unconditionally; this is the escape hatch for system-triggered actions
/// submitted under a pseudo-role of the same name, and the action API
/// depends on it.
pub fn authorize(app: &Application, workflow: &Workflow, action: &str, role: &str) -> bool {
    if action == role {
        return true;
    }

    let Some(role_auths) = app
        .roles
        .iter()
        .find(|candidate| candidate.role == role)
        .map(|candidate| &candidate.auth)
    else {
        return false;
    };

    let matching_events: Vec<_> = workflow
        .events
        .iter()
        .filter(|event| event.name == action && event.role == role)
        .collect();

    if matching_events.is_empty() {
        return false;
    }

    matching_events.iter().any(|event| {
        role_auths.iter().any(|auth| {
            event.from_state == auth.from_state && event.to_state == auth.to_state
        })
    })
}
