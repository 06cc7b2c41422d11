use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiResult,
    response::{created, no_content, success},
    routes::AppState,
    validation,
};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update. Absent fields (and explicit `null`s) leave the
/// stored value unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Raw query string values. Parsed as strings so malformed numbers get
/// the same 422 error envelope as every other rejected parameter
/// instead of the extractor's plain 400.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQueryParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = validation::task::build_new_task(&request)?;
    let task = state.task_service.create_task(input).await?;
    Ok(created(task))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskQueryParams>,
) -> ApiResult<impl IntoResponse> {
    let query = validation::task::build_task_query(&params)?;
    let page = state.task_service.list_tasks(&query).await?;
    Ok(success(page))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let task = state.task_service.get_task(id).await?;
    Ok(success(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    let patch = validation::task::build_task_patch(&request)?;
    let task = state.task_service.update_task(id, patch).await?;
    Ok(success(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.task_service.delete_task(id).await?;
    Ok(no_content())
}
