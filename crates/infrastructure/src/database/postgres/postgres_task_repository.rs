use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};
use tracker_domain::{
    entities::{Task, TaskQuery},
    repositories::TaskRepository,
    task_query_builder::{TaskQueryBuilder, TaskQueryParam},
};
use tracker_errors::{TrackerError, TrackerResult};
use uuid::Uuid;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, created_at, updated_at";

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &sqlx::postgres::PgRow) -> TrackerResult<Task> {
        Ok(Task {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_query_params<'q>(
        mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
        params: &'q [TaskQueryParam],
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        for param in params.iter() {
            query = match param {
                TaskQueryParam::Status(status) => query.bind(status.as_str()),
                TaskQueryParam::Priority(priority) => query.bind(priority.as_str()),
                TaskQueryParam::Int64(value) => query.bind(*value),
            };
        }
        query
    }

    fn bind_scalar_params<'q>(
        mut query: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
        params: &'q [TaskQueryParam],
    ) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
        for param in params.iter() {
            query = match param {
                TaskQueryParam::Status(status) => query.bind(status.as_str()),
                TaskQueryParam::Priority(priority) => query.bind(priority.as_str()),
                TaskQueryParam::Int64(value) => query.bind(*value),
            };
        }
        query
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    #[instrument(skip(self, task), fields(task_id = %task.id, task_title = %task.title))]
    async fn create(&self, task: &Task) -> TrackerResult<Task> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tasks (id, title, description, status, priority, due_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(TrackerError::Database)?;

        let created = Self::row_to_task(&row)?;
        debug!("created task {} '{}'", created.id, created.title);
        Ok(created)
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn get_by_id(&self, id: Uuid) -> TrackerResult<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(TrackerError::Database)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_task(&row)?)),
            None => {
                debug!("task {} not found", id);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, query), fields(
        status = ?query.status,
        priority = ?query.priority,
        sort_by = ?query.sort_by,
        page = %query.page,
        limit = %query.limit,
    ))]
    async fn list(&self, query: &TaskQuery) -> TrackerResult<(Vec<Task>, i64)> {
        let (count_sql, count_params) = TaskQueryBuilder::build_count_query(query);
        let count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let total = Self::bind_scalar_params(count_query, &count_params)
            .fetch_one(&self.pool)
            .await
            .map_err(TrackerError::Database)?;

        let (select_sql, select_params) = TaskQueryBuilder::build_select_query(query);
        let select_query = sqlx::query(&select_sql);
        let rows = Self::bind_query_params(select_query, &select_params)
            .fetch_all(&self.pool)
            .await
            .map_err(TrackerError::Database)?;

        let tasks: TrackerResult<Vec<Task>> = rows.iter().map(Self::row_to_task).collect();
        let tasks = tasks?;
        debug!("list query returned {} of {} tasks", tasks.len(), total);
        Ok((tasks, total))
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update(&self, task: &Task) -> TrackerResult<Task> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, priority = $5,
                due_date = $6, updated_at = $7
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(TrackerError::Database)?;

        match row {
            Some(row) => Self::row_to_task(&row),
            None => Err(TrackerError::task_not_found(task.id)),
        }
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn delete(&self, id: Uuid) -> TrackerResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(TrackerError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
