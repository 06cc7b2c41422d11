use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::borrow::Cow;
use tracker_errors::TrackerError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("validation failed: {0}")]
    ValidationError(#[from] validator::ValidationError),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_type) = match &self {
            ApiError::Tracker(TrackerError::TaskNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("task {id} not found"),
                "TASK_NOT_FOUND",
            ),
            ApiError::Tracker(TrackerError::Validation(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                "VALIDATION_ERROR",
            ),
            ApiError::Tracker(TrackerError::InvalidQuery(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg.clone(),
                "INVALID_QUERY",
            ),
            ApiError::Validation(errors) => {
                let details: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, field_errors)| {
                        let messages: Vec<String> = field_errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .clone()
                                    .unwrap_or(Cow::Borrowed("invalid value"))
                                    .to_string()
                            })
                            .collect();
                        format!("{}: {}", field, messages.join(", "))
                    })
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    details.join("; "),
                    "VALIDATION_ERROR",
                )
            }
            ApiError::ValidationError(error) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                error
                    .message
                    .clone()
                    .unwrap_or(Cow::Borrowed("invalid value"))
                    .to_string(),
                "VALIDATION_ERROR",
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "BAD_REQUEST"),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "requested resource not found".to_string(),
                "NOT_FOUND",
            ),
            ApiError::Tracker(err) => {
                tracing::error!(error = %err, "storage error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
