//! Typed application configuration.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides (prefix `TRACKER`), then validated section by section
//! before the application starts.

pub mod models;

pub use models::{ApiConfig, AppConfig, DatabaseConfig, ObservabilityConfig};
