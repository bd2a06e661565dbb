//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::{health_check, readiness_check, todos};
use crate::middleware::track_requests;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Routes mounted under `/api/todos`.
fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(todos::create_todo).get(todos::list_todos))
        .route("/search", post(todos::search_todos))
        .route("/status/:completed", get(todos::todos_by_status))
        .route("/priority/:priority", get(todos::todos_by_priority))
        .route("/tag/:tag", get(todos::todos_by_tag))
        .route("/overdue", get(todos::overdue_todos))
        .route("/due-soon", get(todos::due_soon_todos))
        .route("/stats", get(todos::todo_stats))
        .route(
            "/:id",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/:id/toggle", patch(todos::toggle_todo))
}

/// Build the complete Axum router.
///
/// Configures:
/// - Health checks (`/health`, `/ready`)
/// - The todo API under `/api/todos`
/// - Correlation ids, request metrics, HTTP tracing, and permissive CORS
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api/todos", todo_routes())
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
