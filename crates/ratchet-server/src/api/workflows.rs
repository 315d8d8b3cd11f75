//! Handlers for the application and workflow endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use ratchet_core::domain::application::jvm_string_hash;
use ratchet_core::{Application, CoreError, ReturnCode, Workflow, WorkflowId};

use crate::api::response::{ApiResponse, PagedApiResponse};
use crate::server::RatchetServer;

/// Body for the workflow action endpoint.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    /// Workflow id to act on.
    pub id: i64,
    /// Action name.
    pub action: String,
    /// Role the action is submitted under.
    pub role: String,
}

/// Body for the workflow delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// Workflow id to delete.
    pub id: i64,
}

/// Body for the catalog query endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Page number, 1-based; non-positive values are normalized.
    #[serde(default)]
    pub page: i32,
    /// Page size; zero selects the defaults.
    #[serde(default)]
    pub page_size: i32,
}

fn rejected(rejection: JsonRejection) -> Json<ApiResponse> {
    debug!(%rejection, "malformed request body");
    Json(ApiResponse::failure_empty(ReturnCode::InvalidInputParameter))
}

/// Handler for creating an application.
pub async fn create_app(
    State(server): State<Arc<RatchetServer>>,
    payload: Result<Json<Application>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(app) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejected(rejection),
    };

    info!(name = %app.name, "creating application");
    // Failure paths echo the raw (unmasked) name hash, matching the id shape
    // callers already parse.
    let raw_hash = i64::from(jvm_string_hash(&app.name));

    match server.service().create_app(app).await {
        Ok(id) => Json(ApiResponse::success(Some(i64::from(id.0)))),
        Err(err) => {
            warn!(%err, "application rejected");
            Json(ApiResponse::failure(err.return_code(), Some(raw_hash)))
        }
    }
}

/// Handler for creating a workflow.
pub async fn create_workflow(
    State(server): State<Arc<RatchetServer>>,
    payload: Result<Json<Workflow>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(workflow) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejected(rejection),
    };

    info!(name = %workflow.name, app_id = %workflow.app_id, "creating workflow");
    match server.service().create_workflow(workflow).await {
        Ok(id) => Json(ApiResponse::success(Some(id.0))),
        Err(err) => {
            warn!(%err, "workflow rejected");
            Json(ApiResponse::failure(err.return_code(), None))
        }
    }
}

/// Handler for the paginated catalog query.
pub async fn query_workflow(
    State(server): State<Arc<RatchetServer>>,
    payload: Result<Json<PageQuery>, JsonRejection>,
) -> Result<Json<PagedApiResponse>, Json<ApiResponse>> {
    let Json(query) = match payload {
        Ok(json) => json,
        Err(rejection) => return Err(rejected(rejection)),
    };

    let page = server
        .service()
        .query_workflow(query.page, query.page_size)
        .await;
    Ok(Json(PagedApiResponse::success(page)))
}

/// Handler for updating a workflow.
pub async fn update_workflow(
    State(server): State<Arc<RatchetServer>>,
    payload: Result<Json<Workflow>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(workflow) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejected(rejection),
    };

    let id = workflow.id;
    info!(workflow_id = %id, "updating workflow");
    match server.service().update_workflow(workflow).await {
        Ok(id) => Json(ApiResponse::success(Some(id.0))),
        Err(err) => {
            warn!(%err, workflow_id = %id, "update rejected");
            let code = err.return_code();
            match err {
                // These paths report no id, matching the existing contract.
                CoreError::FlowNotFound(_) | CoreError::InvalidInput(_) => {
                    Json(ApiResponse::failure_empty(code))
                }
                _ => Json(ApiResponse::failure(code, Some(id.0))),
            }
        }
    }
}

/// Handler for deleting a workflow.
pub async fn delete_workflow(
    State(server): State<Arc<RatchetServer>>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejected(rejection),
    };

    let id = WorkflowId(request.id);
    info!(workflow_id = %id, "deleting workflow");
    match server.service().delete_workflow(id).await {
        Ok(id) => Json(ApiResponse::success(Some(id.0))),
        Err(err) => {
            warn!(%err, workflow_id = %id, "delete rejected");
            Json(ApiResponse::failure(err.return_code(), Some(id.0)))
        }
    }
}

/// Handler for acting on a workflow.
pub async fn workflow_action(
    State(server): State<Arc<RatchetServer>>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Json<ApiResponse> {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return rejected(rejection),
    };

    let id = WorkflowId(request.id);
    info!(workflow_id = %id, action = %request.action, role = %request.role, "workflow action");
    match server
        .service()
        .workflow_action(id, &request.action, &request.role)
        .await
    {
        Ok(id) => Json(ApiResponse::success(Some(id.0))),
        Err(err) => {
            warn!(%err, workflow_id = %id, "action rejected");
            Json(ApiResponse::failure(err.return_code(), Some(id.0)))
        }
    }
}
