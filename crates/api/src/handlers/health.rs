use async_trait::async_trait;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;
use tracker_errors::TrackerResult;
use tracker_infrastructure::DatabaseManager;

use crate::routes::AppState;

/// Liveness probe against the backing store. Abstracted so router tests
/// can run without a database.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn ping(&self) -> TrackerResult<()>;
}

#[async_trait]
impl DatabaseProbe for DatabaseManager {
    async fn ping(&self) -> TrackerResult<()> {
        self.health_check().await
    }
}

/// Reports `healthy` when the database answers a `SELECT 1`, otherwise
/// `degraded`. The response is 200 in both cases.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match state.database.ping().await {
        Ok(()) => "healthy",
        Err(err) => {
            warn!(error = %err, "database health probe failed");
            "unhealthy"
        }
    };

    let status = if database == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}
