//! Builders for constructing test data.

use chrono::{DateTime, Duration, Utc};
use tracker_domain::entities::{Task, TaskPriority, TaskStatus};
use uuid::Uuid;

/// Fluent builder for `Task` fixtures. Defaults match what the service
/// assigns at creation: pending, medium priority, no due date.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TaskBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due_in_days(mut self, days: i64) -> Self {
        self.due_date = Some(Utc::now() + Duration::days(days));
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn build(self) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let task = TaskBuilder::new("defaults").build();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_builder_overrides() {
        let task = TaskBuilder::new("full")
            .description("details")
            .status(TaskStatus::InProgress)
            .priority(TaskPriority::High)
            .due_in_days(2)
            .build();

        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.description.as_deref(), Some("details"));
        assert!(task.due_date.unwrap() > Utc::now());
    }
}
