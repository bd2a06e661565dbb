//! Axum HTTP shell for the todo service.
//!
//! Maps HTTP verbs, paths, and bodies onto [`TodoService`] calls and their
//! outcomes onto status codes.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at the router (`/api/todos/...`)
//! 2. **Middleware** assigns a correlation id, opens a span, counts the request
//! 3. **Extract** path, query, and body; bodies are validated by [`ValidatedJson`]
//! 4. **Call** one `TodoService` operation
//! 5. **Map** the outcome: `Some`/`true` → 2xx, `None`/`false` → 404,
//!    `StoreError` → 500
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todo_service_core::{environment::SystemClock, TodoService};
//! use todo_service_web::{build_router, AppState};
//!
//! let service = TodoService::new(Arc::new(store), Arc::new(SystemClock));
//! let app = build_router(AppState::new(service));
//! axum::serve(listener, app).await?;
//! ```
//!
//! [`TodoService`]: todo_service_core::TodoService

#![allow(clippy::module_name_repetitions)]

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::{AppError, FieldError};
pub use extractors::{CorrelationId, ValidatedJson};
pub use middleware::{CORRELATION_ID_HEADER, track_requests};
pub use router::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
