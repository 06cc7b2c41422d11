use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracker_api::{create_routes, AppState};
use tracker_config::{ApiConfig, AppConfig};
use tracker_domain::services::TaskService;
use tracker_infrastructure::DatabaseManager;

/// Wires the pool, repositories, service, and router together and runs
/// the HTTP server until a shutdown signal arrives.
pub struct Application {
    config: AppConfig,
    database: Arc<DatabaseManager>,
    router: Router,
}

impl Application {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let database = Arc::new(
            DatabaseManager::new(&config.database)
                .await
                .context("failed to connect to database")?,
        );

        let task_service = Arc::new(TaskService::new(database.task_repository()));
        let state = AppState {
            task_service,
            database: database.clone(),
        };

        let mut router = create_routes(state).layer(TimeoutLayer::new(Duration::from_secs(
            config.api.request_timeout_seconds,
        )));
        if config.api.cors_enabled {
            router = router.layer(build_cors_layer(&config.api)?);
        }

        Ok(Self {
            config,
            database,
            router,
        })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        self.database
            .run_migrations()
            .await
            .context("migration run failed")?;
        Ok(())
    }

    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .api
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address: {}", self.config.api.bind_address))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("listening on {addr}");

        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .context("http server error")?;

        info!("http server stopped, closing database pool");
        self.database.close().await;
        Ok(())
    }
}

fn build_cors_layer(config: &ApiConfig) -> Result<CorsLayer> {
    let allow_origin = if config.cors_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .context("invalid CORS origin in configuration")?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
