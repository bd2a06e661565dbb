//! Request and response documents of the `/api/todos` API.
//!
//! Field names are camelCase on the wire. Timestamps use
//! `yyyy-MM-dd'T'HH:mm:ss`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use todo_service_core::timestamp::{serde_format, serde_format_option};
use todo_service_core::{NewTodo, Priority, SearchCriteria, Tags, Todo, TodoId, TodoPatch};
use validator::{Validate, ValidationError};

/// Rejects strings made only of whitespace.
///
/// # Errors
///
/// `blank` when `value` trims to nothing.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Title must not be blank".into()));
    }
    Ok(())
}

/// Body of `POST /api/todos`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    /// Required, non-blank, at most 200 characters.
    #[validate(
        required(message = "Title is required"),
        custom(function = "not_blank"),
        length(max = 200, message = "Title must not exceed 200 characters")
    )]
    pub title: Option<String>,

    /// At most 1000 characters.
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    /// Defaults to `MEDIUM`.
    pub priority: Option<Priority>,

    /// Duplicates collapse.
    pub tags: Option<Tags>,

    /// Optional deadline.
    #[serde(default, with = "serde_format_option")]
    pub due_date: Option<NaiveDateTime>,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(request: CreateTodoRequest) -> Self {
        Self {
            title: request.title.unwrap_or_default(),
            description: request.description,
            priority: request.priority,
            tags: request.tags,
            due_date: request.due_date,
        }
    }
}

/// Body of `PUT /api/todos/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    /// Non-blank and at most 200 characters when present.
    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "Title must not exceed 200 characters")
    )]
    pub title: Option<String>,

    /// At most 1000 characters.
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    /// New completion flag.
    pub completed: Option<bool>,

    /// New priority.
    pub priority: Option<Priority>,

    /// Replaces the tag set.
    pub tags: Option<Tags>,

    /// New deadline.
    #[serde(default, with = "serde_format_option")]
    pub due_date: Option<NaiveDateTime>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(request: UpdateTodoRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            completed: request.completed,
            priority: request.priority,
            tags: request.tags,
            due_date: request.due_date,
        }
    }
}

/// Body of `POST /api/todos/search`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free text over title and description.
    pub search_term: Option<String>,
    /// Completion flag.
    pub completed: Option<bool>,
    /// Priority.
    pub priority: Option<Priority>,
    /// Single tag.
    pub tag: Option<String>,
    /// Due strictly before.
    #[serde(default, with = "serde_format_option")]
    pub due_before: Option<NaiveDateTime>,
}

impl From<SearchRequest> for SearchCriteria {
    fn from(request: SearchRequest) -> Self {
        Self {
            search_term: request.search_term,
            completed: request.completed,
            priority: request.priority,
            tag: request.tag,
            due_before: request.due_before,
        }
    }
}

/// Query string of `GET /api/todos/due-soon`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DueSoonParams {
    /// Window in days; defaults to 7.
    pub days: Option<i64>,
}

/// A todo as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    /// Identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Description, `null` when unset
    pub description: Option<String>,
    /// Completion flag
    pub completed: bool,
    /// Priority name
    pub priority: Priority,
    /// Tags, always an array
    pub tags: Tags,
    /// Creation time
    #[serde(with = "serde_format")]
    pub created_at: NaiveDateTime,
    /// Last modification time
    #[serde(with = "serde_format")]
    pub updated_at: NaiveDateTime,
    /// Deadline, `null` when unset
    #[serde(default, with = "serde_format_option")]
    pub due_date: Option<NaiveDateTime>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.map(TodoId::into_string).unwrap_or_default(),
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            priority: todo.priority,
            tags: todo.tags,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
            due_date: todo.due_date,
        }
    }
}

/// Maps a list of todos to responses.
#[must_use]
pub fn responses(todos: Vec<Todo>) -> Vec<TodoResponse> {
    todos.into_iter().map(TodoResponse::from).collect()
}
