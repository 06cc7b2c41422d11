use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracker_config::DatabaseConfig;
use tracker_domain::repositories::TaskRepository;
use tracker_errors::{TrackerError, TrackerResult};

use super::postgres::PostgresTaskRepository;

/// Owns the connection pool and hands out repository instances.
/// The pool is the only process-wide storage state; each request borrows
/// a connection for its duration and releases it with the round-trip.
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> TrackerResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(TrackerError::Database)?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> TrackerResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(TrackerError::Database)?;
        Ok(())
    }

    pub async fn run_migrations(&self) -> TrackerResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| TrackerError::DatabaseOperation(e.to_string()))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn task_repository(&self) -> Arc<dyn TaskRepository> {
        Arc::new(PostgresTaskRepository::new(self.pool.clone()))
    }
}
