//! HTTP surface for the tracker service.
//!
//! Route handlers stay thin: they validate the request surface, hand
//! typed inputs to `TaskService`, and map `TrackerError` into HTTP
//! status codes through `ApiError`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod validation;

pub use error::{ApiError, ApiResult};
pub use routes::{create_routes, AppState};
