use axum::Json;
use serde_json::{json, Value};

/// Service metadata and endpoint listing for the bare root path.
pub async fn root_info() -> Json<Value> {
    Json(json!({
        "name": "task-tracker",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/api/health",
            "tasks": "/api/tasks",
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
