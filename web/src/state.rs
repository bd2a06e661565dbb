//! Application state for Axum handlers.

use std::sync::Arc;
use todo_service_core::TodoService;

/// Application state shared across all HTTP handlers.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use todo_service_core::{environment::SystemClock, TodoService};
/// use todo_service_web::AppState;
///
/// let service = TodoService::new(Arc::new(store), Arc::new(SystemClock));
/// let state = AppState::new(service);
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Todo use cases.
    pub todos: Arc<TodoService>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(todos: TodoService) -> Self {
        Self {
            todos: Arc::new(todos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Ensure AppState implements Clone (required for Axum)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
