//! Custom Axum extractors.
//!
//! - `ValidatedJson<T>`: JSON body that has passed its `validator` rules
//! - `CorrelationId`: the request's correlation id
//!
//! # Examples
//!
//! ```ignore
//! async fn create(
//!     State(state): State<AppState>,
//!     correlation_id: CorrelationId,
//!     ValidatedJson(request): ValidatedJson<CreateTodoRequest>,
//! ) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
//!     tracing::info!(correlation_id = %correlation_id.0, "Creating todo");
//!     ...
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// JSON request body, deserialized and validated.
///
/// Malformed JSON, wrong field types, and failed validation rules all
/// reject the request with a 400 [`AppError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}

/// Correlation ID for request tracing.
///
/// Reads the id stored by the correlation middleware; without the
/// middleware it falls back to the `X-Correlation-ID` header, or a fresh
/// UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Named {
        #[validate(length(min = 1, max = 5))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidatedJson(named) = ValidatedJson::<Named>::from_request(json_request(r#"{"name":"ok"}"#), &())
            .await
            .unwrap();
        assert_eq!(named.name, "ok");
    }

    #[tokio::test]
    async fn rejects_rule_violation_with_400() {
        let err = ValidatedJson::<Named>::from_request(json_request(r#"{"name":"too long"}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.field_errors()[0].field, "name");
    }

    #[tokio::test]
    async fn rejects_malformed_json_with_400() {
        let err = ValidatedJson::<Named>::from_request(json_request("{"), &())
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn correlation_id_from_header() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .uri("/")
            .header(CORRELATION_ID_HEADER, id.to_string())
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let CorrelationId(extracted) = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(extracted, id);
    }
}
