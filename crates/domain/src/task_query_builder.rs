//! Task query builder - translates a validated [`TaskQuery`] into SQL.
//!
//! Filters are bound as parameters; the sort expression is chosen from a
//! closed set of enums, so no client-supplied string ever reaches the SQL
//! text. Every ordering carries an `id` tie-break so pagination stays
//! deterministic when sort keys collide.

use crate::entities::{SortField, TaskPriority, TaskQuery, TaskStatus};

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, created_at, updated_at";

pub struct TaskQueryBuilder;

impl TaskQueryBuilder {
    /// Build the paginated SELECT for a list query.
    pub fn build_select_query(query: &TaskQuery) -> (String, Vec<TaskQueryParam>) {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1=1");
        let mut params = Vec::new();

        Self::push_filters(&mut sql, &mut params, query);

        sql.push_str(" ORDER BY ");
        sql.push_str(Self::sort_expression(query.sort_by));
        sql.push(' ');
        sql.push_str(query.order.as_sql());
        sql.push_str(", id ASC");

        sql.push_str(" LIMIT $");
        sql.push_str(&(params.len() + 1).to_string());
        params.push(TaskQueryParam::Int64(query.limit));

        sql.push_str(" OFFSET $");
        sql.push_str(&(params.len() + 1).to_string());
        params.push(TaskQueryParam::Int64(query.offset()));

        (sql, params)
    }

    /// Build the COUNT query carrying the same filter predicate and no
    /// pagination, for the page envelope's total.
    pub fn build_count_query(query: &TaskQuery) -> (String, Vec<TaskQueryParam>) {
        let mut sql = "SELECT COUNT(*) FROM tasks WHERE 1=1".to_string();
        let mut params = Vec::new();

        Self::push_filters(&mut sql, &mut params, query);

        (sql, params)
    }

    fn push_filters(sql: &mut String, params: &mut Vec<TaskQueryParam>, query: &TaskQuery) {
        if let Some(status) = query.status {
            sql.push_str(" AND status = $");
            sql.push_str(&(params.len() + 1).to_string());
            params.push(TaskQueryParam::Status(status));
        }

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = $");
            sql.push_str(&(params.len() + 1).to_string());
            params.push(TaskQueryParam::Priority(priority));
        }
    }

    /// Priority is stored as text, so it sorts by rank rather than
    /// alphabetically.
    fn sort_expression(field: SortField) -> &'static str {
        match field {
            SortField::CreatedAt => "created_at",
            SortField::DueDate => "due_date",
            SortField::Priority => {
                "CASE priority WHEN 'low' THEN 1 WHEN 'medium' THEN 2 WHEN 'high' THEN 3 END"
            }
        }
    }
}

/// Query parameter types for type-safe parameter binding
#[derive(Debug, Clone)]
pub enum TaskQueryParam {
    Status(TaskStatus),
    Priority(TaskPriority),
    Int64(i64),
}

impl TaskQueryParam {
    pub fn type_name(&self) -> &'static str {
        match self {
            TaskQueryParam::Status(_) => "TEXT",
            TaskQueryParam::Priority(_) => "TEXT",
            TaskQueryParam::Int64(_) => "BIGINT",
        }
    }
}
