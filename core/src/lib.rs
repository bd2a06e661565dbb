//! # Todo Service Core
//!
//! Domain types and the store gateway contract for the todo service.
//!
//! This crate has no I/O of its own. It defines:
//!
//! - **Entity**: [`Todo`] with its value types ([`TodoId`], [`Priority`], [`Tags`])
//! - **Schema**: which fields the document store indexes and how ([`schema`])
//! - **Gateway**: the [`TodoStore`] trait implemented by the Redis store and the
//!   in-memory test store
//! - **Service**: [`TodoService`], one gateway round-trip per use case
//!
//! ## Request Flow
//!
//! ```text
//! HTTP handler ──▶ TodoService ──▶ TodoStore ──▶ document store
//!      ▲                                              │
//!      └──────────────── Todo / Option<Todo> ◀────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use todo_service_core::{environment::SystemClock, NewTodo, TodoService};
//! use std::sync::Arc;
//!
//! let service = TodoService::new(store, Arc::new(SystemClock));
//! let todo = service.create(NewTodo::titled("Buy milk")).await?;
//! assert!(!todo.completed);
//! ```

pub mod schema;
pub mod search;
pub mod service;
pub mod store;
pub mod timestamp;
pub mod todo;

pub use search::{SearchCriteria, SearchPlan};
pub use service::{NewTodo, TodoPatch, TodoService, TodoStats};
pub use store::{Result, StoreError, StoreFuture, TodoStore};
pub use todo::{ParsePriorityError, Priority, Tags, Todo, TodoId};

/// Environment module - injected dependencies.
///
/// Time is the only ambient dependency of the service. It is abstracted so
/// tests can pin or step it.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use todo_service_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let before = clock.now();
    /// assert!(clock.now() >= before);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
