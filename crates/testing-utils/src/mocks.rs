//! In-memory mock repositories for unit and router tests.
//!
//! The mocks keep the same observable semantics as the Postgres
//! implementations: conjunctive equality filters, a single sort field
//! with an id tie-break, and offset/limit pagination.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracker_domain::entities::{SortField, SortOrder, Task, TaskQuery};
use tracker_domain::repositories::TaskRepository;
use tracker_errors::{TrackerError, TrackerResult};
use uuid::Uuid;

/// Mock implementation of `TaskRepository` backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<HashMap<Uuid, Task>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl MockTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let map = tasks.into_iter().map(|t| (t.id, t)).collect();
        Self {
            tasks: Arc::new(Mutex::new(map)),
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    /// Make the next repository call fail with a storage error. Used to
    /// exercise 500 mapping in handler tests.
    pub fn fail_next_call(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.tasks.lock().unwrap().clear();
    }

    fn check_failure(&self) -> TrackerResult<()> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(TrackerError::DatabaseOperation(
                "injected failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn create(&self, task: &Task) -> TrackerResult<Task> {
        self.check_failure()?;
        let mut tasks = self.tasks.lock().unwrap();
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn get_by_id(&self, id: Uuid) -> TrackerResult<Option<Task>> {
        self.check_failure()?;
        Ok(self.tasks.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, query: &TaskQuery) -> TrackerResult<(Vec<Task>, i64)> {
        self.check_failure()?;
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
        self.check_failure()?;
        let mut tasks = self.tasks.lock().unwrap();
        if !tasks.contains_key(&task.id) {
            return Err(TrackerError::TaskNotFound { id: task.id });
        }
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn delete(&self, id: Uuid) -> TrackerResult<bool> {
        self.check_failure()?;
        Ok(self.tasks.lock().unwrap().remove(&id).is_some())
    }
}
