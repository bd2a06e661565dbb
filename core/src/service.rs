//! Application service.
//!
//! One [`TodoStore`] round-trip per use case, plus the defaulting and merge
//! policy that sits in front of the store. Absence is reported as `None` /
//! `false`; only store failures are errors.

use crate::environment::Clock;
use crate::search::{SearchCriteria, SearchPlan};
use crate::store::{Result, TodoStore};
use crate::timestamp;
use crate::todo::{Priority, Tags, Todo, TodoId};
use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::sync::Arc;

/// Input for creating a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    /// Title (already validated)
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Defaults to [`Priority::Medium`]
    pub priority: Option<Priority>,
    /// Defaults to no tags
    pub tags: Option<Tags>,
    /// Optional deadline
    pub due_date: Option<NaiveDateTime>,
}

impl NewTodo {
    /// A request carrying only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Builds the unsaved record, stamping both timestamps with `now`.
    #[must_use]
    pub fn into_todo(self, now: NaiveDateTime) -> Todo {
        let mut todo = Todo::new(self.title, now);
        todo.description = self.description;
        todo.priority = self.priority.unwrap_or_default();
        todo.tags = self.tags.unwrap_or_default();
        todo.due_date = self.due_date.map(timestamp::truncate);
        todo
    }
}

/// Partial update. `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New completion flag
    pub completed: Option<bool>,
    /// New priority
    pub priority: Option<Priority>,
    /// Replaces the whole tag set
    pub tags: Option<Tags>,
    /// New deadline
    pub due_date: Option<NaiveDateTime>,
}

impl TodoPatch {
    /// Whether the patch carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every field present in the patch.
    ///
    /// Does not touch `updated_at`; that is the caller's job.
    pub fn apply(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = Some(description);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(tags) = self.tags {
            todo.tags = tags;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = Some(timestamp::truncate(due_date));
        }
    }
}

/// Tallies over the whole store. Each field is its own store count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    /// All records
    pub total_todos: u64,
    /// `completed == true`
    pub completed_todos: u64,
    /// `completed == false`
    pub pending_todos: u64,
    /// `priority == HIGH`
    pub high_priority_todos: u64,
    /// `priority == URGENT`
    pub urgent_todos: u64,
}

/// Todo use cases over an injected store and clock.
///
/// Cheap to clone; share one instance across request handlers.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock>,
}

impl TodoService {
    /// Creates a service over `store`, reading time from `clock`.
    #[must_use]
    pub fn new(store: Arc<dyn TodoStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn now(&self) -> NaiveDateTime {
        timestamp::truncate(self.clock.now().naive_utc())
    }

    /// Creates a todo: not completed, both timestamps now, priority defaulted.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn create(&self, new: NewTodo) -> Result<Todo> {
        let todo = new.into_todo(self.now());
        let saved = self.store.save(todo).await?;

        tracing::info!(
            todo_id = ?saved.id,
            priority = %saved.priority,
            "Created todo"
        );

        Ok(saved)
    }

    /// Every todo.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn list_all(&self) -> Result<Vec<Todo>> {
        let todos = self.store.find_all().await?;
        tracing::info!(count = todos.len(), "Listed todos");
        Ok(todos)
    }

    /// One todo, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn get(&self, id: TodoId) -> Result<Option<Todo>> {
        let todo = self.store.find_by_id(id.clone()).await?;
        tracing::info!(todo_id = %id, found = todo.is_some(), "Fetched todo");
        Ok(todo)
    }

    /// Merges `patch` into the stored todo and refreshes `updated_at`.
    ///
    /// Returns `None` when no todo has this id.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>> {
        let Some(mut todo) = self.store.find_by_id(id.clone()).await? else {
            tracing::info!(todo_id = %id, "Update of unknown todo");
            return Ok(None);
        };

        let empty = patch.is_empty();
        patch.apply(&mut todo);
        todo.touch(self.now());
        let saved = self.store.save(todo).await?;

        tracing::info!(todo_id = %id, empty_patch = empty, "Updated todo");
        Ok(Some(saved))
    }

    /// Flips the completion flag.
    ///
    /// Returns `None` when no todo has this id.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn toggle(&self, id: TodoId) -> Result<Option<Todo>> {
        let Some(mut todo) = self.store.find_by_id(id.clone()).await? else {
            return Ok(None);
        };

        todo.toggle(self.now());
        let saved = self.store.save(todo).await?;

        tracing::info!(todo_id = %id, completed = saved.completed, "Toggled todo");
        Ok(Some(saved))
    }

    /// Deletes a todo. `false` when it was already absent.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn delete(&self, id: TodoId) -> Result<bool> {
        if !self.store.exists_by_id(id.clone()).await? {
            tracing::warn!(todo_id = %id, "Delete of unknown todo");
            return Ok(false);
        }

        self.store.delete_by_id(id.clone()).await?;
        tracing::info!(todo_id = %id, "Deleted todo");
        Ok(true)
    }

    /// Single-predicate search, see [`SearchCriteria::plan`].
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Todo>> {
        let ignored = criteria.ignored();
        if !ignored.is_empty() {
            tracing::debug!(?ignored, "Search applies one criterion; others ignored");
        }

        let plan = criteria.plan();
        let criterion = plan.criterion();
        let todos = match plan {
            SearchPlan::FullText(term) => self.store.search_todos(term).await,
            SearchPlan::Completed(completed) => self.store.find_by_completed(completed).await,
            SearchPlan::Priority(priority) => self.store.find_by_priority(priority).await,
            SearchPlan::Tag(tag) => self.store.find_by_tag(tag).await,
            SearchPlan::DueBefore(before) => self.store.find_by_due_date_before(before).await,
            SearchPlan::All => self.store.find_all().await,
        }?;

        tracing::info!(criterion, count = todos.len(), "Searched todos");
        Ok(todos)
    }

    /// Todos with the given completion flag.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn by_status(&self, completed: bool) -> Result<Vec<Todo>> {
        let todos = self.store.find_by_completed(completed).await?;
        tracing::info!(completed, count = todos.len(), "Listed todos by status");
        Ok(todos)
    }

    /// Todos with the given priority.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn by_priority(&self, priority: Priority) -> Result<Vec<Todo>> {
        let todos = self.store.find_by_priority(priority).await?;
        tracing::info!(%priority, count = todos.len(), "Listed todos by priority");
        Ok(todos)
    }

    /// Todos carrying `tag`.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn by_tag(&self, tag: String) -> Result<Vec<Todo>> {
        let todos = self.store.find_by_tag(tag.clone()).await?;
        tracing::info!(tag = %tag, count = todos.len(), "Listed todos by tag");
        Ok(todos)
    }

    /// Open todos whose due date has passed.
    ///
    /// The store query selects by due date only; completed todos are dropped
    /// here.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn overdue(&self) -> Result<Vec<Todo>> {
        let now = self.now();
        let mut todos = self.store.find_by_due_date_before(now).await?;
        todos.retain(|todo| todo.is_overdue(now));

        tracing::info!(%now, count = todos.len(), "Listed overdue todos");
        Ok(todos)
    }

    /// Open todos due within `window` from now (both ends exclusive).
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn due_soon(&self, window: TimeDelta) -> Result<Vec<Todo>> {
        let now = self.now();
        let todos = self.store.find_incomplete_due_between(now, now + window).await?;

        tracing::info!(
            window_hours = window.num_hours(),
            count = todos.len(),
            "Listed todos due soon"
        );
        Ok(todos)
    }

    /// Five independent store counts.
    ///
    /// # Errors
    ///
    /// Store failure.
    pub async fn stats(&self) -> Result<TodoStats> {
        let stats = TodoStats {
            total_todos: self.store.count().await?,
            completed_todos: self.store.count_by_completed(true).await?,
            pending_todos: self.store.count_by_completed(false).await?,
            high_priority_todos: self.store.count_by_priority(Priority::High).await?,
            urgent_todos: self.store.count_by_priority(Priority::Urgent).await?,
        };

        tracing::info!(
            total = stats.total_todos,
            completed = stats.completed_todos,
            "Computed todo stats"
        );
        Ok(stats)
    }

    /// Store connectivity.
    ///
    /// # Errors
    ///
    /// The store is unreachable.
    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn new_todo_defaults() {
        let todo = NewTodo::titled("A").into_todo(noon());

        assert_eq!(todo.priority, Priority::Medium);
        assert!(todo.tags.is_empty());
        assert!(!todo.completed);
        assert_eq!(todo.created_at, noon());
        assert_eq!(todo.updated_at, noon());
    }

    #[test]
    fn new_todo_keeps_supplied_fields() {
        let new = NewTodo {
            title: "A".to_string(),
            description: Some("d".to_string()),
            priority: Some(Priority::Urgent),
            tags: Some(Tags::from(["x".to_string()])),
            due_date: Some(noon()),
        };

        let todo = new.into_todo(noon());

        assert_eq!(todo.description.as_deref(), Some("d"));
        assert_eq!(todo.priority, Priority::Urgent);
        assert!(todo.tags.contains("x"));
        assert_eq!(todo.due_date, Some(noon()));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut todo = NewTodo::titled("A").into_todo(noon());
        let before = todo.clone();

        let patch = TodoPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut todo);

        assert_eq!(todo, before);
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut todo = NewTodo {
            description: Some("keep me".to_string()),
            ..NewTodo::titled("A")
        }
        .into_todo(noon());

        TodoPatch {
            title: Some("B".to_string()),
            completed: Some(true),
            ..TodoPatch::default()
        }
        .apply(&mut todo);

        assert_eq!(todo.title, "B");
        assert!(todo.completed);
        assert_eq!(todo.description.as_deref(), Some("keep me"));
        assert_eq!(todo.priority, Priority::Medium);
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = TodoStats {
            total_todos: 3,
            completed_todos: 1,
            pending_todos: 2,
            high_priority_todos: 1,
            urgent_todos: 0,
        };

        let json = serde_json::to_value(stats).unwrap();

        assert_eq!(json["totalTodos"], 3);
        assert_eq!(json["pendingTodos"], 2);
        assert_eq!(json["highPriorityTodos"], 1);
    }
}
