//! Axum middleware for request tracking and observability.
//!
//! [`track_requests`] runs around every request:
//!
//! 1. **Extract** the correlation ID from `X-Correlation-ID` (or generate a new UUID)
//! 2. **Store** it in request extensions as [`CorrelationId`]
//! 3. **Run** the handler inside an `http_request` span carrying the id
//! 4. **Count** the request in `todo.requests` by route template, method, and status
//! 5. **Inject** the correlation ID into the response header
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use todo_service_web::middleware::track_requests;
//!
//! let app = Router::new()
//!     .route("/api/todos", get(list_todos))
//!     .layer(middleware::from_fn(track_requests));
//! ```

use crate::extractors::CorrelationId;
use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// `route` label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template of the request (`/api/todos/:id`), never the raw path.
fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_string(), |p| p.as_str().to_string())
}

/// Correlation, tracing span, and request metrics for one request.
pub async fn track_requests(mut req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    req.extensions_mut().insert(CorrelationId(correlation_id));

    let route = route_label(&req);
    let method = req.method().to_string();

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    metrics::counter!(
        "todo.requests",
        "route" => route,
        "method" => method,
        "status" => response.status().as_u16().to_string(),
    )
    .increment(1);

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, header_value);
    }

    response
}
