use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kintsugi_core::error::KintsugiError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 429 Too Many Requests errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 429 through
/// the `anyhow::Error` chain without touching the `KintsugiError` enum.
#[derive(Debug)]
struct RateLimitedError(String);

impl std::fmt::Display for RateLimitedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RateLimitedError {}

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `KintsugiError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 429 Too Many Requests error.
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self(RateLimitedError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(r) = self.0.downcast_ref::<RateLimitedError>() {
            let body = serde_json::json!({ "error": r.0.clone() });
            return (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
        }
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<KintsugiError>() {
            match e {
                KintsugiError::NotInitialized => StatusCode::BAD_REQUEST,
                KintsugiError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
                KintsugiError::ProfileExists(_) => StatusCode::CONFLICT,
                KintsugiError::InvalidProfileId(_)
                | KintsugiError::InvalidCrackKind(_)
                | KintsugiError::InvalidActivityKind(_)
                | KintsugiError::InvalidLanguage(_) => StatusCode::BAD_REQUEST,
                KintsugiError::InvalidProfile(_) => StatusCode::UNPROCESSABLE_ENTITY,
                KintsugiError::Io(_) | KintsugiError::Yaml(_) | KintsugiError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
