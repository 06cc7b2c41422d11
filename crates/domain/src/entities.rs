use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracker_errors::{TrackerError, TrackerResult};
use uuid::Uuid;

pub const TITLE_MAX_LENGTH: usize = 200;
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(TrackerError::invalid_query(format!(
                "invalid status '{other}', must be one of: pending, in_progress, completed"
            ))),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for TaskStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("VARCHAR")
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TaskStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse()
            .map_err(|_| format!("invalid task status: {s}").into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for TaskStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskPriority {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Ordering rank used when sorting by priority (low < medium < high).
    pub fn rank(&self) -> i32 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(TrackerError::invalid_query(format!(
                "invalid priority '{other}', must be one of: low, medium, high"
            ))),
        }
    }
}

impl sqlx::Type<sqlx::Postgres> for TaskPriority {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("VARCHAR")
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TaskPriority {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse()
            .map_err(|_| format!("invalid task priority: {s}").into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for TaskPriority {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
    }
}

/// Input for creating a task. Timestamps and the id are assigned by the
/// service, never by the caller.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn validate(&self, now: DateTime<Utc>) -> TrackerResult<()> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(due_date) = self.due_date {
            validate_due_date(due_date, now)?;
        }
        Ok(())
    }
}

/// Partial update. A `None` field is left unchanged; only supplied fields
/// are validated, so a stored due date in the past does not block an
/// unrelated status change.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn validate(&self, now: DateTime<Utc>) -> TrackerResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(due_date) = self.due_date {
            validate_due_date(due_date, now)?;
        }
        Ok(())
    }

}

/// The bound is on length only: 1 to 200 characters. Whitespace counts,
/// so a title of spaces is accepted.
pub fn validate_title(title: &str) -> TrackerResult<()> {
    if title.is_empty() {
        return Err(TrackerError::validation_error("title must not be empty"));
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(TrackerError::validation_error(format!(
            "title must not exceed {TITLE_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> TrackerResult<()> {
    if description.chars().count() > DESCRIPTION_MAX_LENGTH {
        return Err(TrackerError::validation_error(format!(
            "description must not exceed {DESCRIPTION_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A due date equal to `now` is rejected: the rule is strictly-in-the-future.
pub fn validate_due_date(due_date: DateTime<Utc>, now: DateTime<Utc>) -> TrackerResult<()> {
    if due_date <= now {
        return Err(TrackerError::validation_error(
            "due_date must be in the future",
        ));
    }
    Ok(())
}

impl Task {
    pub fn new(input: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place, bumping `updated_at`.
    pub fn apply_patch(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::DueDate => "due_date",
            SortField::Priority => "priority",
        }
    }
}

impl FromStr for SortField {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "due_date" => Ok(SortField::DueDate),
            "priority" => Ok(SortField::Priority),
            other => Err(TrackerError::invalid_query(format!(
                "invalid sort_by '{other}', must be one of: created_at, due_date, priority"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(TrackerError::invalid_query(format!(
                "invalid order '{other}', must be asc or desc"
            ))),
        }
    }
}

/// Validated list-query plan: equality filters, one sort field with a
/// stable id tie-break, and an offset/limit pair. Construction fails on
/// out-of-range page or limit instead of clamping.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub page: i64,
    pub limit: i64,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            sort_by: SortField::default(),
            order: SortOrder::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TaskQuery {
    pub fn new(
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
        sort_by: SortField,
        order: SortOrder,
        page: i64,
        limit: i64,
    ) -> TrackerResult<Self> {
        if page < 1 {
            return Err(TrackerError::invalid_query("page must be >= 1"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(TrackerError::invalid_query(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(Self {
            status,
            priority,
            sort_by,
            order,
            page,
            limit,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "in_progress", "completed"] {
            let status: TaskStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
        assert!("active".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_priority_round_trip_and_rank() {
        for p in ["low", "medium", "high"] {
            let priority: TaskPriority = p.parse().unwrap();
            assert_eq!(priority.as_str(), p);
        }
        assert!(TaskPriority::Low.rank() < TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() < TaskPriority::High.rank());
        assert!("urgent".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_status_serde_uses_wire_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    #[test]
    fn test_validate_title_bounds() {
        assert!(validate_title("a").is_ok());
        assert!(validate_title(&"x".repeat(TITLE_MAX_LENGTH)).is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"x".repeat(TITLE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_title_counts_whitespace_as_characters() {
        assert!(validate_title("   ").is_ok());
        assert!(validate_title(&" ".repeat(TITLE_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_description_bounds() {
        assert!(validate_description(&"d".repeat(DESCRIPTION_MAX_LENGTH)).is_ok());
        assert!(validate_description(&"d".repeat(DESCRIPTION_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_due_date_must_be_strictly_future() {
        let now = Utc::now();
        assert!(validate_due_date(now + Duration::seconds(1), now).is_ok());
        assert!(validate_due_date(now, now).is_err());
        assert!(validate_due_date(now - Duration::seconds(1), now).is_err());
    }

    #[test]
    fn test_new_task_assigns_unique_ids_and_timestamps() {
        let input = NewTask {
            title: "first".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
        };
        let a = Task::new(input.clone());
        let b = Task::new(input);
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_apply_patch_only_touches_supplied_fields() {
        let mut task = Task::new(NewTask {
            title: "original".to_string(),
            description: Some("desc".to_string()),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            due_date: None,
        });
        let created_at = task.created_at;
        let now = task.updated_at + Duration::seconds(5);

        task.apply_patch(
            TaskPatch {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
            now,
        );

        assert_eq!(task.title, "original");
        assert_eq!(task.description.as_deref(), Some("desc"));
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.updated_at, now);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn test_patch_validates_only_supplied_fields() {
        let now = Utc::now();
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(patch.validate(now).is_ok());

        let patch = TaskPatch {
            due_date: Some(now - Duration::hours(1)),
            ..Default::default()
        };
        assert!(patch.validate(now).is_err());
    }

    #[test]
    fn test_query_rejects_out_of_range_paging() {
        let ok = TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 1, 10);
        assert!(ok.is_ok());

        assert!(TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 0, 10).is_err());
        assert!(TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 1, 0).is_err());
        assert!(TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 1, 101).is_err());
    }

    #[test]
    fn test_query_offset_computation() {
        let query = TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 2, 10).unwrap();
        assert_eq!(query.offset(), 10);
        let query = TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 5, 25).unwrap();
        assert_eq!(query.offset(), 100);
    }

    #[test]
    fn test_query_defaults() {
        let query = TaskQuery::default();
        assert_eq!(query.page, DEFAULT_PAGE);
        assert_eq!(query.limit, DEFAULT_LIMIT);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Asc);
    }
}
