//! Todo API endpoints.
//!
//! All routes live under `/api/todos`:
//! - POST / - Create a todo
//! - GET / - List every todo
//! - GET /:id - Get one todo
//! - PUT /:id - Partially update a todo
//! - DELETE /:id - Delete a todo
//! - PATCH /:id/toggle - Flip the completion flag
//! - POST /search - Single-criterion search
//! - GET /status/:completed, /priority/:priority, /tag/:tag - Filters
//! - GET /overdue, /due-soon - Deadline views
//! - GET /stats - Tallies

use crate::dto::{
    CreateTodoRequest, DueSoonParams, SearchRequest, TodoResponse, UpdateTodoRequest, responses,
};
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;
use crate::WebResult;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::TimeDelta;
use todo_service_core::{ParsePriorityError, Priority, SearchCriteria, TodoId, TodoStats};

/// Default `due-soon` window, in days.
pub const DEFAULT_DUE_SOON_DAYS: i64 = 7;

/// Largest accepted `due-soon` window, in days.
pub const MAX_DUE_SOON_DAYS: i64 = 365;

/// Create a todo.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/todos \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Write docs", "priority": "HIGH", "tags": ["docs"]}'
/// ```
///
/// # Errors
///
/// 400 on invalid input, 500 on store failure.
pub async fn create_todo(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTodoRequest>,
) -> WebResult<(StatusCode, Json<TodoResponse>)> {
    let todo = state.todos.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// List every todo.
///
/// # Errors
///
/// 500 on store failure.
pub async fn list_todos(State(state): State<AppState>) -> WebResult<Json<Vec<TodoResponse>>> {
    Ok(Json(responses(state.todos.list_all().await?)))
}

/// Get one todo.
///
/// # Errors
///
/// 404 when absent, 500 on store failure.
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .get(TodoId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::not_found("Todo", &id))?;
    Ok(Json(todo.into()))
}

/// Partially update a todo. Absent fields keep their value.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:8080/api/todos/3f2a... \
///   -H "Content-Type: application/json" \
///   -d '{"priority": "URGENT"}'
/// ```
///
/// # Errors
///
/// 400 on invalid input, 404 when absent, 500 on store failure.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTodoRequest>,
) -> WebResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .update(TodoId::new(id.clone()), request.into())
        .await?
        .ok_or_else(|| AppError::not_found("Todo", &id))?;
    Ok(Json(todo.into()))
}

/// Delete a todo.
///
/// # Errors
///
/// 404 when absent, 500 on store failure.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<StatusCode> {
    if state.todos.delete(TodoId::new(id.clone())).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Todo", &id))
    }
}

/// Flip the completion flag.
///
/// # Errors
///
/// 404 when absent, 500 on store failure.
pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .toggle(TodoId::new(id.clone()))
        .await?
        .ok_or_else(|| AppError::not_found("Todo", &id))?;
    Ok(Json(todo.into()))
}

/// Search by one criterion (term, completed, priority, tag, or due-before,
/// first present wins).
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/todos/search \
///   -H "Content-Type: application/json" \
///   -d '{"searchTerm": "redis"}'
/// ```
///
/// # Errors
///
/// 400 on malformed body, 500 on store failure.
pub async fn search_todos(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> WebResult<Json<Vec<TodoResponse>>> {
    let criteria = SearchCriteria::from(request);
    Ok(Json(responses(state.todos.search(&criteria).await?)))
}

/// Todos by completion flag (`true` / `false`).
///
/// # Errors
///
/// 400 when the flag is not a boolean, 500 on store failure.
pub async fn todos_by_status(
    State(state): State<AppState>,
    Path(completed): Path<String>,
) -> WebResult<Json<Vec<TodoResponse>>> {
    let completed = if completed.eq_ignore_ascii_case("true") {
        true
    } else if completed.eq_ignore_ascii_case("false") {
        false
    } else {
        return Err(AppError::bad_request(format!(
            "Invalid completion status '{completed}' (expected true or false)"
        )));
    };

    Ok(Json(responses(state.todos.by_status(completed).await?)))
}

/// Todos by priority (case-insensitive name).
///
/// # Errors
///
/// 400 on an unknown priority, 500 on store failure.
pub async fn todos_by_priority(
    State(state): State<AppState>,
    Path(priority): Path<String>,
) -> WebResult<Json<Vec<TodoResponse>>> {
    let priority: Priority = priority
        .parse()
        .map_err(|e: ParsePriorityError| AppError::bad_request(e.to_string()))?;

    Ok(Json(responses(state.todos.by_priority(priority).await?)))
}

/// Todos carrying a tag.
///
/// # Errors
///
/// 500 on store failure.
pub async fn todos_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> WebResult<Json<Vec<TodoResponse>>> {
    Ok(Json(responses(state.todos.by_tag(tag).await?)))
}

/// Open todos past their due date.
///
/// # Errors
///
/// 500 on store failure.
pub async fn overdue_todos(State(state): State<AppState>) -> WebResult<Json<Vec<TodoResponse>>> {
    Ok(Json(responses(state.todos.overdue().await?)))
}

/// Open todos due within the next `days` days (default 7, at most 365).
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/api/todos/due-soon?days=3
/// ```
///
/// # Errors
///
/// 400 when `days` is not an integer in range, 500 on store failure.
pub async fn due_soon_todos(
    State(state): State<AppState>,
    params: Result<Query<DueSoonParams>, QueryRejection>,
) -> WebResult<Json<Vec<TodoResponse>>> {
    let Query(params) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let days = params.days.unwrap_or(DEFAULT_DUE_SOON_DAYS);

    if !(1..=MAX_DUE_SOON_DAYS).contains(&days) {
        return Err(AppError::bad_request(format!(
            "days must be between 1 and {MAX_DUE_SOON_DAYS}, got {days}"
        )));
    }

    Ok(Json(responses(
        state.todos.due_soon(TimeDelta::days(days)).await?,
    )))
}

/// Tallies: total, completed, pending, high priority, urgent.
///
/// # Errors
///
/// 500 on store failure.
pub async fn todo_stats(State(state): State<AppState>) -> WebResult<Json<TodoStats>> {
    Ok(Json(state.todos.stats().await?))
}
