use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracker_domain::services::TaskService;

use crate::handlers::{
    health::{health_check, DatabaseProbe},
    root::root_info,
    tasks::{create_task, delete_task, get_task, list_tasks, update_task},
};

#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
    pub database: Arc<dyn DatabaseProbe>,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_info))
        .route("/api/health", get(health_check))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
