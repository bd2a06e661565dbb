//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check the store.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness check: pings the store.
///
/// # Status Codes
///
/// - 200 OK: store reachable
/// - 503 Service Unavailable: store unreachable
///
/// # Endpoint
///
/// ```text
/// GET /ready
/// ```
///
/// # Errors
///
/// 503 when the store does not answer.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.todos.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        AppError::unavailable("Store is not reachable")
    })?;

    Ok(Json(json!({ "status": "ready" })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use todo_service_core::TodoService;
    use todo_service_testing::{InMemoryTodoStore, test_clock};

    fn state(store: &InMemoryTodoStore) -> AppState {
        AppState::new(TodoService::new(Arc::new(store.clone()), Arc::new(test_clock())))
    }

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, body) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let store = InMemoryTodoStore::new();

        let Json(body) = readiness_check(State(state(&store))).await.unwrap();
        assert_eq!(body["status"], "ready");

        store.set_offline(true);
        let err = readiness_check(State(state(&store))).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
