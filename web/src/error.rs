//! Error types for web handlers.
//!
//! [`AppError`] is what every handler returns on failure. It carries the
//! HTTP status, a stable error code, a user-facing message, and, for
//! validation failures, one entry per offending field.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use todo_service_core::StoreError;
use validator::ValidationErrors;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as it appears in the request JSON.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(Path(id): Path<String>) -> Result<Json<TodoResponse>, AppError> {
///     let todo = state.todos.get(id.clone().into()).await?
///         .ok_or_else(|| AppError::not_found("Todo", &id))?;
///     Ok(Json(todo.into()))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Field-level validation failures
    errors: Vec<FieldError>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            errors: Vec::new(),
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Error code of the response body.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Field errors of the response body.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 400 error listing the rejected fields.
    #[must_use]
    pub fn invalid_fields(errors: Vec<FieldError>) -> Self {
        let mut error = Self::new(
            StatusCode::BAD_REQUEST,
            "Request validation failed".to_string(),
            "VALIDATION_ERROR".to_string(),
        );
        error.errors = errors;
        error
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Field-level failures; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            errors: self.errors,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Store failures become a 500; the detail stays in the logs.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal("An internal error occurred").with_source(anyhow::Error::new(err))
    }
}

/// Validation failures become a 400 with one entry per failed rule.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| FieldError {
                    field: field.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map_or_else(|| failure.code.to_string(), ToString::to_string),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));

        Self::invalid_fields(fields)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_not_found() {
        let err = AppError::not_found("Todo", "123");
        assert_eq!(err.to_string(), "[NOT_FOUND] Todo with id 123 not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_error_is_internal() {
        let err = AppError::from(StoreError::Connection("refused".to_string()));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert!(!err.to_string().contains("refused"));
    }

    #[test]
    fn validation_errors_list_fields() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "title",
            ValidationError::new("length").with_message("Title too long".into()),
        );
        errors.add("description", ValidationError::new("length"));

        let err = AppError::from(errors);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(
            err.field_errors(),
            &[
                FieldError {
                    field: "description".to_string(),
                    message: "length".to_string(),
                },
                FieldError {
                    field: "title".to_string(),
                    message: "Title too long".to_string(),
                },
            ]
        );
    }
}
