//! Health check endpoint.

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe; the engine is in-memory, so reachable means healthy.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ratchet-server",
    }))
}
