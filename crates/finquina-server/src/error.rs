//! Error types for the HTTP layer.
//!
//! [`ApiError`] converts into a JSON response of the form
//! `{ "error": "...", "status": 400 }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use finquina_core::ActionError;

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// The database is offline, so the write was not stored.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// A 404 for `what` with the given id.
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} {id}"))
    }

    /// The write was skipped because nothing could be stored.
    pub fn not_stored(what: &str) -> Self {
        Self::Unavailable(format!("{what} not stored"))
    }
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Invalid(msg) => Self::BadRequest(msg),
            ActionError::Storage(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = match self {
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::Unavailable(msg)
            | Self::Internal(msg) => msg,
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_a_bad_request() {
        let err = ApiError::from(ActionError::Invalid("El nombre es requerido".to_owned()));
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "El nombre es requerido"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn statuses_follow_the_variant() {
        assert_eq!(
            ApiError::not_found("crop", 4).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::not_stored("crop").into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
