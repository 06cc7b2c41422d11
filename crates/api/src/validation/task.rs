//! Request-surface validation. The service layer re-checks business
//! rules; this layer rejects malformed fields before they reach it and
//! aggregates per-field errors for the 422 body.

use std::borrow::Cow;
use std::str::FromStr;
use validator::{ValidationError, ValidationErrors};

use tracker_domain::entities::{
    NewTask, SortField, SortOrder, TaskPatch, TaskPriority, TaskQuery, TaskStatus,
    DEFAULT_LIMIT, DEFAULT_PAGE, DESCRIPTION_MAX_LENGTH, TITLE_MAX_LENGTH,
};

use crate::error::ApiError;
use crate::handlers::tasks::{CreateTaskRequest, TaskQueryParams, UpdateTaskRequest};

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(rule("title_empty", "title must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(rule(
            "title_length",
            "title must not exceed 200 characters",
        ));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_LENGTH {
        return Err(rule(
            "description_length",
            "description must not exceed 1000 characters",
        ));
    }
    Ok(())
}

pub fn parse_status(value: &str) -> Result<TaskStatus, ValidationError> {
    value.parse().map_err(|_| {
        rule(
            "status_invalid",
            "status must be one of: pending, in_progress, completed",
        )
    })
}

pub fn parse_priority(value: &str) -> Result<TaskPriority, ValidationError> {
    value.parse().map_err(|_| {
        rule(
            "priority_invalid",
            "priority must be one of: low, medium, high",
        )
    })
}

/// Validate a creation request and lower it to a `NewTask`. Unspecified
/// status and priority take the documented defaults.
pub fn build_new_task(request: &CreateTaskRequest) -> Result<NewTask, ApiError> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_title(&request.title) {
        errors.add("title", e);
    }
    if let Some(description) = request.description.as_deref() {
        if let Err(e) = validate_description(description) {
            errors.add("description", e);
        }
    }

    let status = match request.status.as_deref() {
        Some(raw) => parse_status(raw).unwrap_or_else(|e| {
            errors.add("status", e);
            TaskStatus::Pending
        }),
        None => TaskStatus::Pending,
    };
    let priority = match request.priority.as_deref() {
        Some(raw) => parse_priority(raw).unwrap_or_else(|e| {
            errors.add("priority", e);
            TaskPriority::Medium
        }),
        None => TaskPriority::Medium,
    };

    if !errors.is_empty() {
        return Err(errors.into());
    }

    Ok(NewTask {
        title: request.title.clone(),
        description: request.description.clone(),
        status,
        priority,
        due_date: request.due_date,
    })
}

/// Validate an update request and lower it to a `TaskPatch`. Only the
/// supplied fields are checked.
pub fn build_task_patch(request: &UpdateTaskRequest) -> Result<TaskPatch, ApiError> {
    let mut errors = ValidationErrors::new();

    if let Some(title) = request.title.as_deref() {
        if let Err(e) = validate_title(title) {
            errors.add("title", e);
        }
    }
    if let Some(description) = request.description.as_deref() {
        if let Err(e) = validate_description(description) {
            errors.add("description", e);
        }
    }

    let status = match request.status.as_deref() {
        Some(raw) => match parse_status(raw) {
            Ok(status) => Some(status),
            Err(e) => {
                errors.add("status", e);
                None
            }
        },
        None => None,
    };
    let priority = match request.priority.as_deref() {
        Some(raw) => match parse_priority(raw) {
            Ok(priority) => Some(priority),
            Err(e) => {
                errors.add("priority", e);
                None
            }
        },
        None => None,
    };

    if !errors.is_empty() {
        return Err(errors.into());
    }

    Ok(TaskPatch {
        title: request.title.clone(),
        description: request.description.clone(),
        status,
        priority,
        due_date: request.due_date,
    })
}

/// Parse raw list-endpoint query parameters into a validated
/// `TaskQuery`. Unknown enum values and out-of-range page/limit reject
/// the request instead of being clamped.
pub fn build_task_query(params: &TaskQueryParams) -> Result<TaskQuery, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(TaskStatus::from_str)
        .transpose()?;
    let priority = params
        .priority
        .as_deref()
        .map(TaskPriority::from_str)
        .transpose()?;
    let sort_by = params
        .sort_by
        .as_deref()
        .map(SortField::from_str)
        .transpose()?
        .unwrap_or_default();
    let order = params
        .order
        .as_deref()
        .map(SortOrder::from_str)
        .transpose()?
        .unwrap_or_default();

    let page = parse_integer("page", params.page.as_deref())?.unwrap_or(DEFAULT_PAGE);
    let limit = parse_integer("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);

    Ok(TaskQuery::new(status, priority, sort_by, order, page, limit)?)
}

fn parse_integer(field: &str, value: Option<&str>) -> Result<Option<i64>, ApiError> {
    match value {
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            tracker_errors::TrackerError::invalid_query(format!("{field} must be an integer"))
                .into()
        }),
        None => Ok(None),
    }
}
