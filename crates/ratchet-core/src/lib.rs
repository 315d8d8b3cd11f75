//!
//! Ratchet Core - workflow definition and transition engine
//!
//! This crate defines the domain models, validators, authorization check,
//! transition engine, and orchestration service for Ratchet. Transports and
//! alternative persistence layers build on the interfaces exposed here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - core business models, entities, and rules
pub mod domain;

/// Application services - core application logic
pub mod application;

/// Shared types for the catalog and pagination
pub mod types;

/// Error types and result codes
pub mod error;

// Re-export key types
pub use error::{CoreError, ReturnCode};
pub use types::{Content, PagedData};

// Re-export main API types for easy use
pub use application::workflow_service::WorkflowService;
pub use domain::application::{AppId, Application, Auth, Role, State};
pub use domain::authorization::authorize;
pub use domain::machine::{StateMachine, AUTO_EVENT};
pub use domain::repository::{
    ApplicationRepository, AtomicIdGenerator, Clock, IdGenerator, MemoryApplicationRepository,
    SystemClock,
};
pub use domain::store::DefinitionStore;
pub use domain::workflow::{has_cycle, Event, Workflow, WorkflowId};
