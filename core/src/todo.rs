//! The todo entity and its value types.

use crate::timestamp;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: u64 = 200;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_LEN: u64 = 1000;

/// Tags attached to a todo. A set, so duplicates collapse on insert.
pub type Tags = BTreeSet<String>;

/// Opaque identifier of a stored todo.
///
/// Assigned by the store on first save and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier (UUID v4, simple form).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Priority of a todo.
///
/// Exactly four levels. Serialized by name only (`"LOW"`, `"MEDIUM"`,
/// `"HIGH"`, `"URGENT"`); the declaration order is not part of the wire format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default level.
    #[default]
    Medium,
    /// Should be handled soon.
    High,
    /// Drop everything.
    Urgent,
}

impl Priority {
    /// All priority levels.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Wire name of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no priority level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown priority '{0}' (expected one of LOW, MEDIUM, HIGH, URGENT)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}

/// A todo record.
///
/// `id` is `None` only for a record that has never been saved; the store
/// fills it in on first save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Store-assigned identifier
    pub id: Option<TodoId>,
    /// Short title (full-text indexed)
    pub title: String,
    /// Longer description (full-text indexed)
    pub description: Option<String>,
    /// Completion flag
    pub completed: bool,
    /// Priority level
    pub priority: Priority,
    /// Tags (membership indexed)
    pub tags: Tags,
    /// Set once, when the todo is created
    pub created_at: NaiveDateTime,
    /// Refreshed on every mutation
    pub updated_at: NaiveDateTime,
    /// Optional deadline
    pub due_date: Option<NaiveDateTime>,
}

impl Todo {
    /// Creates an unsaved todo with default flags and both timestamps at `now`.
    #[must_use]
    pub fn new(title: impl Into<String>, now: NaiveDateTime) -> Self {
        let now = timestamp::truncate(now);
        Self {
            id: None,
            title: title.into(),
            description: None,
            completed: false,
            priority: Priority::default(),
            tags: Tags::new(),
            created_at: now,
            updated_at: now,
            due_date: None,
        }
    }

    /// Marks the todo as modified at `now`.
    ///
    /// `updated_at` always moves forward by at least one millisecond, even if
    /// the clock reads earlier than the previous modification.
    pub fn touch(&mut self, now: NaiveDateTime) {
        let floor = self.updated_at + TimeDelta::milliseconds(1);
        self.updated_at = timestamp::truncate(now).max(floor);
    }

    /// Flips the completion flag and touches the record.
    pub fn toggle(&mut self, now: NaiveDateTime) {
        self.completed = !self.completed;
        self.touch(now);
    }

    /// Whether the todo is still open and its due date lies before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn new_todo_has_defaults() {
        let todo = Todo::new("Write docs", at(9, 0, 0));

        assert_eq!(todo.id, None);
        assert!(!todo.completed);
        assert_eq!(todo.priority, Priority::Medium);
        assert!(todo.tags.is_empty());
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn touch_moves_forward_even_with_stale_clock() {
        let mut todo = Todo::new("A", at(9, 0, 0));

        todo.touch(at(8, 0, 0));

        assert!(todo.updated_at > todo.created_at);
        assert_eq!(todo.updated_at - todo.created_at, TimeDelta::milliseconds(1));
    }

    #[test]
    fn touch_uses_clock_when_ahead() {
        let mut todo = Todo::new("A", at(9, 0, 0));
        todo.touch(at(10, 0, 0));
        assert_eq!(todo.updated_at, at(10, 0, 0));
        assert_eq!(todo.created_at, at(9, 0, 0));
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut todo = Todo::new("A", at(9, 0, 0));
        todo.toggle(at(9, 0, 0));
        let first = todo.updated_at;
        todo.toggle(at(9, 0, 0));

        assert!(!todo.completed);
        assert!(todo.updated_at > first);
    }

    #[test]
    fn overdue_ignores_completed() {
        let mut todo = Todo::new("A", at(9, 0, 0));
        todo.due_date = Some(at(8, 0, 0));
        assert!(todo.is_overdue(at(9, 0, 0)));

        todo.completed = true;
        assert!(!todo.is_overdue(at(9, 0, 0)));
    }

    #[test]
    fn overdue_requires_due_date() {
        let todo = Todo::new("A", at(9, 0, 0));
        assert!(!todo.is_overdue(at(23, 0, 0)));
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("URGENT".parse::<Priority>(), Ok(Priority::Urgent));
        assert_eq!(" Low ".parse::<Priority>(), Ok(Priority::Low));
        assert!("CRITICAL".parse::<Priority>().is_err());
        assert!("1".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_serializes_by_name() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"URGENT\"");

        let parsed: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Priority::Low);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = TodoId::generate();
        let b = TodoId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    proptest::proptest! {
        #[test]
        fn touch_is_strictly_increasing(offsets in proptest::collection::vec(-86_400_000i64..86_400_000, 1..20)) {
            let start = at(12, 0, 0);
            let mut todo = Todo::new("A", start);

            for offset in offsets {
                let before = todo.updated_at;
                todo.touch(start + TimeDelta::milliseconds(offset));
                proptest::prop_assert!(todo.updated_at > before);
                proptest::prop_assert_eq!(todo.created_at, start);
            }
        }
    }
}
