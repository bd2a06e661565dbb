//! In-memory todo store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use todo_service_core::schema::tokenize;
use todo_service_core::{Priority, StoreError, StoreFuture, Tags, Todo, TodoId, TodoStore};

/// Mock todo store.
///
/// Keeps records in a `HashMap` and evaluates every finder the way the Redis
/// store's index does: case-insensitive tags, numeric ranges with the same bound
/// inclusivity, and word-level full-text matching. Results are ordered by
/// creation time so assertions can be positional.
///
/// [`set_offline`](Self::set_offline) makes every call fail with
/// [`StoreError::Connection`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<Mutex<HashMap<TodoId, Todo>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryTodoStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away (or coming back).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored records (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned or the store is offline.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.with_todos(|todos| todos.len())
    }

    /// Whether the store holds no record.
    ///
    /// # Errors
    ///
    /// Returns error if lock is poisoned or the store is offline.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|len| len == 0)
    }

    fn with_todos<T>(
        &self,
        f: impl FnOnce(&mut HashMap<TodoId, Todo>) -> T,
    ) -> Result<T, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store offline".to_string()));
        }

        let mut todos = self
            .todos
            .lock()
            .map_err(|_| StoreError::Command("Mutex lock failed".to_string()))?;
        Ok(f(&mut todos))
    }

    fn select(
        &self,
        predicate: impl Fn(&Todo) -> bool + Send + 'static,
    ) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            self.with_todos(|todos| {
                let mut found: Vec<Todo> =
                    todos.values().filter(|t| predicate(t)).cloned().collect();
                found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                found
            })
        })
    }

    fn tally(
        &self,
        predicate: impl Fn(&Todo) -> bool + Send + 'static,
    ) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            self.with_todos(|todos| todos.values().filter(|t| predicate(t)).count() as u64)
        })
    }
}

/// `todo` carries one of `wanted` (already lowercased), ignoring case.
fn has_any_tag(todo: &Todo, wanted: &[String]) -> bool {
    todo.tags
        .iter()
        .any(|tag| wanted.contains(&tag.to_lowercase()))
}

/// Every word of `term` occurs as a word of `text`.
fn matches_all_words(text: &str, term: &[String]) -> bool {
    let haystack = tokenize(text);
    !term.is_empty() && term.iter().all(|w| haystack.contains(w))
}

impl TodoStore for InMemoryTodoStore {
    fn save(&self, mut todo: Todo) -> StoreFuture<'_, Todo> {
        Box::pin(async move {
            let id = todo.id.get_or_insert_with(TodoId::generate).clone();
            self.with_todos(|todos| {
                todos.insert(id, todo.clone());
                todo
            })
        })
    }

    fn find_by_id(&self, id: TodoId) -> StoreFuture<'_, Option<Todo>> {
        Box::pin(async move { self.with_todos(|todos| todos.get(&id).cloned()) })
    }

    fn exists_by_id(&self, id: TodoId) -> StoreFuture<'_, bool> {
        Box::pin(async move { self.with_todos(|todos| todos.contains_key(&id)) })
    }

    fn delete_by_id(&self, id: TodoId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.with_todos(|todos| {
                todos.remove(&id);
            })
        })
    }

    fn delete_all(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            self.with_todos(|todos| {
                let removed = todos.len() as u64;
                todos.clear();
                removed
            })
        })
    }

    fn find_all(&self) -> StoreFuture<'_, Vec<Todo>> {
        self.select(|_| true)
    }

    fn find_by_title(&self, title: String) -> StoreFuture<'_, Option<Todo>> {
        Box::pin(async move {
            let found = self.select(move |t| t.title == title).await?;
            Ok(found.into_iter().next())
        })
    }

    fn find_by_completed(&self, completed: bool) -> StoreFuture<'_, Vec<Todo>> {
        self.select(move |t| t.completed == completed)
    }

    fn find_by_priority(&self, priority: Priority) -> StoreFuture<'_, Vec<Todo>> {
        self.select(move |t| t.priority == priority)
    }

    fn find_by_due_date_before(&self, before: NaiveDateTime) -> StoreFuture<'_, Vec<Todo>> {
        self.select(move |t| t.due_date.is_some_and(|due| due < before))
    }

    fn find_by_created_at_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StoreFuture<'_, Vec<Todo>> {
        self.select(move |t| from <= t.created_at && t.created_at <= to)
    }

    fn find_incomplete_due_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StoreFuture<'_, Vec<Todo>> {
        self.select(move |t| !t.completed && t.due_date.is_some_and(|due| from < due && due < to))
    }

    fn find_by_tag(&self, tag: String) -> StoreFuture<'_, Vec<Todo>> {
        let tag = tag.to_lowercase();
        self.select(move |t| !tag.is_empty() && has_any_tag(t, std::slice::from_ref(&tag)))
    }

    fn find_by_tags(&self, tags: Tags) -> StoreFuture<'_, Vec<Todo>> {
        let wanted: Vec<String> = tags
            .iter()
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.to_lowercase())
            .collect();
        self.select(move |t| has_any_tag(t, &wanted))
    }

    fn search_todos(&self, term: String) -> StoreFuture<'_, Vec<Todo>> {
        let term = tokenize(&term);
        self.select(move |t| {
            matches_all_words(&t.title, &term)
                || t.description
                    .as_deref()
                    .is_some_and(|d| matches_all_words(d, &term))
        })
    }

    fn count(&self) -> StoreFuture<'_, u64> {
        self.tally(|_| true)
    }

    fn count_by_completed(&self, completed: bool) -> StoreFuture<'_, u64> {
        self.tally(move |t| t.completed == completed)
    }

    fn count_by_priority(&self, priority: Priority) -> StoreFuture<'_, u64> {
        self.tally(move |t| t.priority == priority)
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.with_todos(|_| ()) })
    }
}
