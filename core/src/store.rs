//! Store gateway contract.
//!
//! The [`TodoStore`] trait is the only boundary between the service and the
//! document store. Every method maps to exactly one store query; matching,
//! ranking, and counting happen inside the store.
//!
//! # Implementations
//!
//! - `RedisTodoStore` (in `todo-service-redis`): Redis JSON documents indexed by RediSearch
//! - `InMemoryTodoStore` (in `todo-service-testing`): `HashMap`-backed, for tests
//!
//! # Absence
//!
//! A missing record is `Ok(None)` / `Ok(false)`, never an error. Errors are
//! reserved for the store itself failing.

use crate::todo::{Priority, Tags, Todo, TodoId};
use chrono::NaiveDateTime;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Boxed future returned by [`TodoStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Errors reported by the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not reach the store.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed a command.
    #[error("Command error: {0}")]
    Command(String),

    /// A stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The secondary index could not be created or is missing.
    #[error("Index error: {0}")]
    Index(String),

    /// The store answered with a reply shape we do not understand.
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),
}

/// Gateway to the external document store holding todo records.
///
/// # Dyn Compatibility
///
/// Methods return [`StoreFuture`] instead of using `async fn` so the service
/// can hold an `Arc<dyn TodoStore>`.
pub trait TodoStore: Send + Sync {
    /// Insert or overwrite a record by id.
    ///
    /// A record without id gets a fresh one. Returns the stored record.
    ///
    /// # Errors
    ///
    /// Any store failure, unmodified.
    fn save(&self, todo: Todo) -> StoreFuture<'_, Todo>;

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Store failure. Absence is `Ok(None)`.
    fn find_by_id(&self, id: TodoId) -> StoreFuture<'_, Option<Todo>>;

    /// Presence check.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn exists_by_id(&self, id: TodoId) -> StoreFuture<'_, bool>;

    /// Remove a record. Removing an absent id is not an error.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn delete_by_id(&self, id: TodoId) -> StoreFuture<'_, ()>;

    /// Remove every todo record. Used by the seed loader.
    ///
    /// Returns the number of removed records.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn delete_all(&self) -> StoreFuture<'_, u64>;

    /// Every record, in no particular order.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_all(&self) -> StoreFuture<'_, Vec<Todo>>;

    /// Exact title match; first hit.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_title(&self, title: String) -> StoreFuture<'_, Option<Todo>>;

    /// Exact match on the completion flag.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_completed(&self, completed: bool) -> StoreFuture<'_, Vec<Todo>>;

    /// Exact match on priority.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_priority(&self, priority: Priority) -> StoreFuture<'_, Vec<Todo>>;

    /// Records whose due date is strictly before `before`.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_due_date_before(&self, before: NaiveDateTime) -> StoreFuture<'_, Vec<Todo>>;

    /// Records created within `[from, to]` (inclusive).
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_created_at_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StoreFuture<'_, Vec<Todo>>;

    /// Records that are not completed and due within `(from, to)` (exclusive).
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_incomplete_due_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StoreFuture<'_, Vec<Todo>>;

    /// Records carrying `tag`.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_tag(&self, tag: String) -> StoreFuture<'_, Vec<Todo>>;

    /// Records carrying any of `tags`.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn find_by_tags(&self, tags: Tags) -> StoreFuture<'_, Vec<Todo>>;

    /// Full-text search over title OR description.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn search_todos(&self, term: String) -> StoreFuture<'_, Vec<Todo>>;

    /// Total number of records.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn count(&self) -> StoreFuture<'_, u64>;

    /// Number of records with the given completion flag.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn count_by_completed(&self, completed: bool) -> StoreFuture<'_, u64>;

    /// Number of records with the given priority.
    ///
    /// # Errors
    ///
    /// Store failure.
    fn count_by_priority(&self, priority: Priority) -> StoreFuture<'_, u64>;

    /// Connectivity check.
    ///
    /// # Errors
    ///
    /// The store is unreachable.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
