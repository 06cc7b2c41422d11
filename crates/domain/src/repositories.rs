//! Storage abstraction for tasks.
//!
//! A thin contract: no caching, no retries. Storage failures propagate as
//! [`TrackerError::Database`] to the caller.

use crate::entities::{Task, TaskQuery};
use async_trait::async_trait;
use tracker_errors::TrackerResult;
use uuid::Uuid;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &Task) -> TrackerResult<Task>;

    async fn get_by_id(&self, id: Uuid) -> TrackerResult<Option<Task>>;

    /// Execute the query plan, returning the page rows and the total count
    /// of rows matching the filters (ignoring pagination).
    async fn list(&self, query: &TaskQuery) -> TrackerResult<(Vec<Task>, i64)>;

    async fn update(&self, task: &Task) -> TrackerResult<Task>;

    /// Returns `false` when no row had the given id.
    async fn delete(&self, id: Uuid) -> TrackerResult<bool>;
}
