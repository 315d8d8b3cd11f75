//! API module for the Ratchet Server
//!
//! This module contains the API routes and handlers for the Ratchet Server.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod response;
pub mod workflows;

use crate::server::RatchetServer;

/// Build the router for API endpoints
pub fn build_router(server: Arc<RatchetServer>) -> Router {
    Router::new()
        // Application management
        .route("/api/app/create", post(workflows::create_app))
        // Workflow management
        .route("/api/workflow/create", post(workflows::create_workflow))
        .route("/api/workflow/query", post(workflows::query_workflow))
        .route("/api/workflow/update", post(workflows::update_workflow))
        .route("/api/workflow/delete", post(workflows::delete_workflow))
        .route("/api/workflow/action", post(workflows::workflow_action))
        // Health check
        .route("/health", get(health::health_check))
        // Request tracing
        .layer(TraceLayer::new_for_http())
        // Shared state
        .with_state(server)
}
