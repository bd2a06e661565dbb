//! # Todo Service Testing
//!
//! Testing utilities for the todo service.
//!
//! This crate provides:
//! - Deterministic clocks ([`FixedClock`], [`ManualClock`])
//! - [`InMemoryTodoStore`], a `TodoStore` with the same filter semantics as
//!   the Redis store
//! - Fixture builders and proptest strategies for domain types
//!
//! ## Example
//!
//! ```ignore
//! use todo_service_testing::{test_clock, InMemoryTodoStore};
//! use todo_service_core::{NewTodo, TodoService};
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn creates_todo() {
//!     let service = TodoService::new(Arc::new(InMemoryTodoStore::new()), Arc::new(test_clock()));
//!     let todo = service.create(NewTodo::titled("A")).await.unwrap();
//!     assert!(todo.id.is_some());
//! }
//! ```

use chrono::{DateTime, Utc};
use todo_service_core::environment::Clock;

pub mod store;

pub use store::InMemoryTodoStore;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use chrono::TimeDelta;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_service_testing::mocks::FixedClock;
    /// use todo_service_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when told to.
    ///
    /// Clones share the same time, so a test can keep a handle while the
    /// service owns another.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a clock starting at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock by `delta` (negative values move it back).
        pub fn advance(&self, delta: TimeDelta) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += delta;
        }

        /// Set the clock to `time`.
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// 2025-01-01 00:00:00 UTC, the reference instant used across tests.
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is hardcoded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_instant() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_instant())
    }

    /// Create a manual clock starting at 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn manual_test_clock() -> ManualClock {
        ManualClock::new(test_instant())
    }
}

/// Fixture builders.
pub mod helpers {
    use chrono::NaiveDateTime;
    use todo_service_core::{Priority, Tags, Todo};

    /// Builds stored-shape [`Todo`] records for seeding a store directly.
    ///
    /// ```
    /// use todo_service_testing::helpers::TodoBuilder;
    /// use todo_service_core::Priority;
    /// # let now = chrono::NaiveDateTime::default();
    ///
    /// let todo = TodoBuilder::new("Ship it").priority(Priority::High).tag("work").build(now);
    /// assert!(todo.tags.contains("work"));
    /// ```
    #[derive(Debug, Clone)]
    pub struct TodoBuilder {
        title: String,
        description: Option<String>,
        completed: bool,
        priority: Priority,
        tags: Tags,
        due_date: Option<NaiveDateTime>,
    }

    impl TodoBuilder {
        /// Start a builder with the given title.
        #[must_use]
        pub fn new(title: impl Into<String>) -> Self {
            Self {
                title: title.into(),
                description: None,
                completed: false,
                priority: Priority::default(),
                tags: Tags::new(),
                due_date: None,
            }
        }

        /// Set the description.
        #[must_use]
        pub fn description(mut self, description: impl Into<String>) -> Self {
            self.description = Some(description.into());
            self
        }

        /// Mark as completed.
        #[must_use]
        pub const fn completed(mut self) -> Self {
            self.completed = true;
            self
        }

        /// Set the priority.
        #[must_use]
        pub const fn priority(mut self, priority: Priority) -> Self {
            self.priority = priority;
            self
        }

        /// Add a tag.
        #[must_use]
        pub fn tag(mut self, tag: impl Into<String>) -> Self {
            self.tags.insert(tag.into());
            self
        }

        /// Set the due date.
        #[must_use]
        pub const fn due(mut self, due_date: NaiveDateTime) -> Self {
            self.due_date = Some(due_date);
            self
        }

        /// Build an unsaved todo created at `now`.
        #[must_use]
        pub fn build(self, now: NaiveDateTime) -> Todo {
            let mut todo = Todo::new(self.title, now);
            todo.description = self.description;
            todo.completed = self.completed;
            todo.priority = self.priority;
            todo.tags = self.tags;
            todo.due_date = self.due_date;
            todo
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use chrono::{NaiveDateTime, TimeDelta};
    use proptest::prelude::*;
    use todo_service_core::{Priority, Tags, TodoPatch};

    /// Any priority level.
    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop::sample::select(Priority::ALL.to_vec())
    }

    /// A small tag set drawn from a short vocabulary, so sets overlap.
    pub fn arb_tags() -> impl Strategy<Value = Tags> {
        prop::collection::btree_set(
            prop::sample::select(vec!["work", "home", "redis", "urgent-ish", "q3"])
                .prop_map(str::to_string),
            0..4,
        )
    }

    /// A due date within a year either side of `anchor`, at second precision.
    pub fn arb_due_date(anchor: NaiveDateTime) -> impl Strategy<Value = NaiveDateTime> {
        (-31_536_000i64..31_536_000).prop_map(move |secs| anchor + TimeDelta::seconds(secs))
    }

    /// Any partial update, including the empty one.
    pub fn arb_patch(anchor: NaiveDateTime) -> impl Strategy<Value = TodoPatch> {
        (
            proptest::option::of("[a-zA-Z][a-zA-Z ]{0,30}"),
            proptest::option::of("[a-z ]{0,60}"),
            proptest::option::of(any::<bool>()),
            proptest::option::of(arb_priority()),
            proptest::option::of(arb_tags()),
            proptest::option::of(arb_due_date(anchor)),
        )
            .prop_map(
                |(title, description, completed, priority, tags, due_date)| TodoPatch {
                    title,
                    description,
                    completed,
                    priority,
                    tags,
                    due_date,
                },
            )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, ManualClock, manual_test_clock, test_clock, test_instant};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = manual_test_clock();
        let handle = clock.clone();

        handle.advance(TimeDelta::minutes(5));

        assert_eq!(clock.now() - test_instant(), TimeDelta::minutes(5));
    }
}
