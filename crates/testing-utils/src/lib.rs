//! Shared testing utilities for the tracker workspace.
//!
//! Provides an in-memory `TaskRepository` that mirrors the Postgres
//! implementation's filter, sort, and pagination semantics, plus a
//! builder for constructing test tasks.
//!
//! Add this crate as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! tracker-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
