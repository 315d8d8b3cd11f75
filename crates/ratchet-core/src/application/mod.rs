//! Application services composing the domain layer into use cases.

/// The workflow orchestration service.
pub mod workflow_service;
