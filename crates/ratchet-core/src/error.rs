use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use crate::domain::application::AppId;
use crate::domain::workflow::WorkflowId;

/// Result codes exposed at the service boundary.
///
/// Every operation resolves to one of these; the numeric codes are part of
/// the external contract and must not change. A subset is currently emitted;
/// the remaining codes are reserved for validation paths callers may add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    /// Operation completed.
    Success,
    /// Begin or end state is unreasonable.
    StartOrEndStateInvalid,
    /// An application must declare at least three states.
    StateCountLessThanThree,
    /// Begin or end state is missing from the state list.
    StartOrEndStateNotInList,
    /// The claimed role is not permitted to perform the action.
    UserRolePermissionInvalid,
    /// A state transition is unreasonable.
    StateTransitionInvalid,
    /// A required state is missing.
    MissingRequiredState,
    /// A state name is illegal.
    IllegalStateName,
    /// The transition graph contains a circular dependency.
    CircularDependencyInStateTransitions,
    /// A transition has no trigger condition.
    NoConditionForStateTransitions,
    /// The referenced application id does not exist.
    AppIdNotExist,
    /// The referenced workflow id does not exist.
    FlowIdNotExist,
    /// The workflow has advanced past its initial state.
    FlowInProgress,
    /// The requested transition is illegal.
    IllegalStateTransition,
    /// An input parameter is invalid.
    InvalidInputParameter,
    /// Unexpected internal failure.
    SystemError,
    /// The workflow name is empty or invalid.
    InvalidWorkflowName,
    /// The workflow name is already taken.
    DuplicateWorkflowName,
}

impl ReturnCode {
    /// Numeric code carried on the wire.
    pub fn code(&self) -> u32 {
        match self {
            ReturnCode::Success => 20000,
            ReturnCode::StartOrEndStateInvalid => 50010,
            ReturnCode::StateCountLessThanThree => 50011,
            ReturnCode::StartOrEndStateNotInList => 50012,
            ReturnCode::UserRolePermissionInvalid => 50013,
            ReturnCode::StateTransitionInvalid => 50020,
            ReturnCode::MissingRequiredState => 50021,
            ReturnCode::IllegalStateName => 50022,
            ReturnCode::CircularDependencyInStateTransitions => 50023,
            ReturnCode::NoConditionForStateTransitions => 50024,
            ReturnCode::AppIdNotExist => 50031,
            ReturnCode::FlowIdNotExist => 50032,
            ReturnCode::FlowInProgress => 50033,
            ReturnCode::IllegalStateTransition => 50040,
            ReturnCode::InvalidInputParameter => 50050,
            ReturnCode::SystemError => 50502,
            ReturnCode::InvalidWorkflowName => 50060,
            ReturnCode::DuplicateWorkflowName => 50061,
        }
    }

    /// Human-readable message carried on the wire.
    pub fn message(&self) -> &'static str {
        match self {
            ReturnCode::Success => "operation succeeded",
            ReturnCode::StartOrEndStateInvalid => "begin or end state is invalid",
            ReturnCode::StateCountLessThanThree => "state count must be at least three",
            ReturnCode::StartOrEndStateNotInList => "begin or end state is not in the state list",
            ReturnCode::UserRolePermissionInvalid => "user role permission is invalid",
            ReturnCode::StateTransitionInvalid => "state transition is invalid",
            ReturnCode::MissingRequiredState => "a required state is missing",
            ReturnCode::IllegalStateName => "illegal state name",
            ReturnCode::CircularDependencyInStateTransitions => {
                "circular dependency in state transitions"
            }
            ReturnCode::NoConditionForStateTransitions => {
                "state transition without a trigger condition"
            }
            ReturnCode::AppIdNotExist => "app id does not exist",
            ReturnCode::FlowIdNotExist => "flow id does not exist",
            ReturnCode::FlowInProgress => "flow is in progress",
            ReturnCode::IllegalStateTransition => "illegal state transition",
            ReturnCode::InvalidInputParameter => "invalid input parameter",
            ReturnCode::SystemError => "system error, please retry later",
            ReturnCode::InvalidWorkflowName => "workflow name is invalid",
            ReturnCode::DuplicateWorkflowName => "workflow name is duplicated",
        }
    }
}

// Wire shape is {"code": n, "msg": "..."}.
impl Serialize for ReturnCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ReturnCode", 2)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("msg", self.message())?;
        state.end()
    }
}

/// Core error type for the Ratchet engine.
///
/// Errors are values: every core operation returns a `Result` carrying one of
/// these, and the service boundary maps them onto [`ReturnCode`]s. Nothing in
/// the core panics or signals failure out-of-band.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An application declared fewer than three states.
    #[error("application must declare at least three states")]
    StateCountLessThanThree,

    /// Begin or end state is missing from the application's state list.
    #[error("begin or end state is not in the state list")]
    StartOrEndStateNotInList,

    /// A transition violates the graph rules.
    #[error("illegal state transition: {0}")]
    IllegalStateTransition(String),

    /// The workflow name is empty.
    #[error("workflow name is empty")]
    InvalidWorkflowName,

    /// The workflow name is already taken.
    #[error("duplicate workflow name: {0}")]
    DuplicateWorkflowName(String),

    /// No application is registered under the given id.
    #[error("application not found: {0}")]
    AppNotFound(AppId),

    /// No workflow is registered under the given id.
    #[error("workflow not found: {0}")]
    FlowNotFound(WorkflowId),

    /// The workflow has advanced past its initial state.
    #[error("workflow {0} is in progress")]
    FlowInProgress(WorkflowId),

    /// The claimed role may not perform the action.
    #[error("role {role:?} is not permitted to perform {action:?}")]
    PermissionDenied {
        /// Action that was attempted.
        action: String,
        /// Role it was attempted under.
        role: String,
    },

    /// An input parameter is invalid.
    #[error("invalid input parameter: {0}")]
    InvalidInput(String),

    /// State machine construction failed.
    #[error("machine build error: {0}")]
    MachineBuild(String),
}

impl CoreError {
    /// Map the error onto its wire-level result code.
    pub fn return_code(&self) -> ReturnCode {
        match self {
            CoreError::StateCountLessThanThree => ReturnCode::StateCountLessThanThree,
            CoreError::StartOrEndStateNotInList => ReturnCode::StartOrEndStateNotInList,
            CoreError::IllegalStateTransition(_) => ReturnCode::IllegalStateTransition,
            CoreError::InvalidWorkflowName => ReturnCode::InvalidWorkflowName,
            CoreError::DuplicateWorkflowName(_) => ReturnCode::DuplicateWorkflowName,
            CoreError::AppNotFound(_) => ReturnCode::AppIdNotExist,
            CoreError::FlowNotFound(_) => ReturnCode::FlowIdNotExist,
            CoreError::FlowInProgress(_) => ReturnCode::FlowInProgress,
            CoreError::PermissionDenied { .. } => ReturnCode::UserRolePermissionInvalid,
            CoreError::InvalidInput(_) => ReturnCode::InvalidInputParameter,
            CoreError::MachineBuild(_) => ReturnCode::SystemError,
        }
    }
}
