//! Task service - orchestrates validation and repository calls.

use crate::entities::{NewTask, Task, TaskPatch, TaskQuery};
use crate::repositories::TaskRepository;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracker_errors::{TrackerError, TrackerResult};
use uuid::Uuid;

/// A bounded slice of the matching result set plus paging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl TaskPage {
    pub fn new(items: Vec<Task>, total: i64, page: i64, limit: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };

        Self {
            items,
            total,
            page,
            limit,
            pages,
        }
    }
}

pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Validate the input, assign id and timestamps, and persist.
    pub async fn create_task(&self, input: NewTask) -> TrackerResult<Task> {
        input.validate(Utc::now())?;
        let task = Task::new(input);
        self.repository.create(&task).await
    }

    pub async fn get_task(&self, id: Uuid) -> TrackerResult<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TrackerError::TaskNotFound { id })
    }

    pub async fn list_tasks(&self, query: &TaskQuery) -> TrackerResult<TaskPage> {
        let (items, total) = self.repository.list(query).await?;
        Ok(TaskPage::new(items, total, query.page, query.limit))
    }

    /// Apply only the supplied fields; validation covers supplied fields
    /// only, so a stored due date in the past never blocks an unrelated
    /// change. `updated_at` is always advanced.
    pub async fn update_task(&self, id: Uuid, patch: TaskPatch) -> TrackerResult<Task> {
        let now = Utc::now();
        patch.validate(now)?;

        let mut task = self.get_task(id).await?;
        task.apply_patch(patch, now);
        self.repository.update(&task).await
    }

    /// Hard delete. Deleting the same id twice yields not-found the
    /// second time.
    pub async fn delete_task(&self, id: Uuid) -> TrackerResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(TrackerError::TaskNotFound { id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SortField, SortOrder, TaskPriority, TaskStatus};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory repository mirroring the Postgres implementation's
    /// filter/sort/pagination semantics closely enough for service tests.
    #[derive(Default)]
    struct InMemoryTaskRepository {
        tasks: Mutex<HashMap<Uuid, Task>>,
    }

    #[async_trait]
    impl TaskRepository for InMemoryTaskRepository {
        async fn create(&self, task: &Task) -> TrackerResult<Task> {
            let mut tasks = self.tasks.lock().unwrap();
            tasks.insert(task.id, task.clone());
            Ok(task.clone())
        }

        async fn get_by_id(&self, id: Uuid) -> TrackerResult<Option<Task>> {
            Ok(self.tasks.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self, query: &TaskQuery) -> TrackerResult<(Vec<Task>, i64)> {
            let tasks = self.tasks.lock().unwrap();
            let mut matching: Vec<Task> = tasks
                .values()
                .filter(|t| query.status.map_or(true, |s| t.status == s))
                .filter(|t| query.priority.map_or(true, |p| t.priority == p))
                .cloned()
                .collect();

            matching.sort_by(|a, b| {
                let key = match query.sort_by {
                    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortField::DueDate => a.due_date.cmp(&b.due_date),
                    SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
                };
                let key = match query.order {
                    SortOrder::Asc => key,
                    SortOrder::Desc => key.reverse(),
                };
                key.then(a.id.cmp(&b.id))
            });

            let total = matching.len() as i64;
            let items = matching
                .into_iter()
                .skip(query.offset() as usize)
                .take(query.limit as usize)
                .collect();
            Ok((items, total))
        }

        async fn update(&self, task: &Task) -> TrackerResult<Task> {
            let mut tasks = self.tasks.lock().unwrap();
            if !tasks.contains_key(&task.id) {
                return Err(TrackerError::TaskNotFound { id: task.id });
            }
            tasks.insert(task.id, task.clone());
            Ok(task.clone())
        }

        async fn delete(&self, id: Uuid) -> TrackerResult<bool> {
            Ok(self.tasks.lock().unwrap().remove(&id).is_some())
        }
    }

    fn service() -> TaskService {
        TaskService::new(Arc::new(InMemoryTaskRepository::default()))
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_echoes_status_and_priority() {
        let service = service();
        let mut input = new_task("write report");
        input.status = TaskStatus::InProgress;
        input.priority = TaskPriority::High;

        let task = service.create_task(input).await.unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let service = service();
        let a = service.create_task(new_task("a")).await.unwrap();
        let b = service.create_task(new_task("b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_rejects_past_due_date() {
        let service = service();
        let mut input = new_task("late");
        input.due_date = Some(Utc::now() - Duration::hours(1));

        let err = service.create_task(input).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let service = service();
        let err = service.create_task(new_task("")).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_accepts_whitespace_only_title() {
        let service = service();
        let task = service.create_task(new_task("   ")).await.unwrap();
        assert_eq!(task.title, "   ");
    }

    #[tokio::test]
    async fn test_get_missing_task_is_not_found() {
        let service = service();
        let id = Uuid::new_v4();
        let err = service.get_task(id).await.unwrap_err();
        assert!(matches!(err, TrackerError::TaskNotFound { id: got } if got == id));
    }

    #[tokio::test]
    async fn test_list_pagination_over_fifteen_items() {
        let service = service();
        for i in 0..15 {
            service.create_task(new_task(&format!("task {i}"))).await.unwrap();
        }

        let query = TaskQuery::new(None, None, SortField::CreatedAt, SortOrder::Asc, 2, 10).unwrap();
        let page = service.list_tasks(&query).await.unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 15);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 10);
        assert_eq!(page.pages, 2);
    }

    #[tokio::test]
    async fn test_list_filters_are_a_conjunction() {
        let service = service();

        let mut both = new_task("both");
        both.status = TaskStatus::Pending;
        both.priority = TaskPriority::High;
        let both = service.create_task(both).await.unwrap();

        let mut status_only = new_task("status only");
        status_only.status = TaskStatus::Pending;
        status_only.priority = TaskPriority::Low;
        service.create_task(status_only).await.unwrap();

        let mut priority_only = new_task("priority only");
        priority_only.status = TaskStatus::Completed;
        priority_only.priority = TaskPriority::High;
        service.create_task(priority_only).await.unwrap();

        let query = TaskQuery::new(
            Some(TaskStatus::Pending),
            Some(TaskPriority::High),
            SortField::CreatedAt,
            SortOrder::Asc,
            1,
            10,
        )
        .unwrap();
        let page = service.list_tasks(&query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, both.id);
    }

    #[tokio::test]
    async fn test_list_due_date_ties_fall_back_to_id_order() {
        let service = service();
        let due = Utc::now() + Duration::days(1);
        for i in 0..4 {
            let mut input = new_task(&format!("tied {i}"));
            input.due_date = Some(due);
            service.create_task(input).await.unwrap();
        }

        let query = TaskQuery::new(None, None, SortField::DueDate, SortOrder::Asc, 1, 10).unwrap();
        let first = service.list_tasks(&query).await.unwrap();
        let second = service.list_tasks(&query).await.unwrap();

        let first_ids: Vec<Uuid> = first.items.iter().map(|t| t.id).collect();
        let second_ids: Vec<Uuid> = second.items.iter().map(|t| t.id).collect();
        assert_eq!(first_ids, second_ids);

        let mut sorted = first_ids.clone();
        sorted.sort();
        assert_eq!(first_ids, sorted);
    }

    #[tokio::test]
    async fn test_update_partial_leaves_other_fields_untouched() {
        let service = service();
        let mut input = new_task("keep me");
        input.priority = TaskPriority::High;
        input.due_date = Some(Utc::now() + Duration::days(3));
        let created = service.create_task(input).await.unwrap();

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let updated = service.update_task(created.id, patch).await.unwrap();

        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.priority, created.priority);
        assert_eq!(updated.due_date, created.due_date);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_newly_supplied_past_due_date() {
        let service = service();
        let created = service.create_task(new_task("due check")).await.unwrap();

        let patch = TaskPatch {
            due_date: Some(Utc::now() - Duration::minutes(1)),
            ..Default::default()
        };
        let err = service.update_task(created.id, patch).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let service = service();
        let err = service
            .update_task(Uuid::new_v4(), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::TaskNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_twice_yields_not_found_second_time() {
        let service = service();
        let created = service.create_task(new_task("doomed")).await.unwrap();

        service.delete_task(created.id).await.unwrap();
        let err = service.delete_task(created.id).await.unwrap_err();
        assert!(matches!(err, TrackerError::TaskNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_task_is_not_found() {
        let service = service();
        let err = service.delete_task(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, TrackerError::TaskNotFound { .. }));
    }

    #[test]
    fn test_page_count_is_ceiling() {
        let page = TaskPage::new(vec![], 10, 1, 3);
        assert_eq!(page.pages, 4);
        let page = TaskPage::new(vec![], 0, 1, 10);
        assert_eq!(page.pages, 0);
        let page = TaskPage::new(vec![], 20, 2, 10);
        assert_eq!(page.pages, 2);
    }
}
