//! JSON document stored under each todo key.

use serde::{Deserialize, Serialize};
use todo_service_core::timestamp::{from_millis, to_millis};
use todo_service_core::{Priority, StoreError, Tags, Todo, TodoId};

/// Stored shape of a todo.
///
/// Timestamps are epoch milliseconds so the numeric indexes can range over
/// them. Absent optional fields are left out of the document entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDocument {
    /// Record id, repeated inside the document.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Completion flag, a JSON boolean.
    pub completed: bool,
    /// Priority name.
    pub priority: Priority,
    /// Tags, as a JSON array.
    #[serde(default)]
    pub tags: Tags,
    /// Creation time, epoch millis.
    pub created_at: i64,
    /// Last modification, epoch millis.
    pub updated_at: i64,
    /// Deadline, epoch millis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
}

impl TodoDocument {
    /// Document for `todo` stored under `id`.
    #[must_use]
    pub fn from_todo(id: &TodoId, todo: &Todo) -> Self {
        Self {
            id: id.as_str().to_string(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
            priority: todo.priority,
            tags: todo.tags.clone(),
            created_at: to_millis(todo.created_at),
            updated_at: to_millis(todo.updated_at),
            due_date: todo.due_date.map(to_millis),
        }
    }

    /// Back to the entity.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialization`] when a timestamp is out of range.
    pub fn into_todo(self) -> Result<Todo, StoreError> {
        let millis = |value: i64, name: &str| {
            from_millis(value).ok_or_else(|| {
                StoreError::Serialization(format!("{name} out of range in todo {}: {value}", self.id))
            })
        };

        let created_at = millis(self.created_at, "createdAt")?;
        let updated_at = millis(self.updated_at, "updatedAt")?;
        let due_date = self
            .due_date
            .map(|due| millis(due, "dueDate"))
            .transpose()?;

        Ok(Todo {
            id: Some(TodoId::new(self.id)),
            title: self.title,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
            tags: self.tags,
            created_at,
            updated_at,
            due_date,
        })
    }

    /// Encode as JSON text.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decode from JSON text.
    ///
    /// # Errors
    ///
    /// [`StoreError::Serialization`] on malformed documents.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
