//! Mapping from domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

/// Error returned by every handler. The body is always `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    Internal(catnote_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<catnote_core::Error> for ApiError {
    fn from(err: catnote_core::Error) -> Self {
        match err {
            catnote_core::Error::ScopeResolution(scope) => ApiError::BadRequest(scope.to_string()),
            catnote_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            catnote_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<catnote_core::ScopeError> for ApiError {
    fn from(err: catnote_core::ScopeError) -> Self {
        ApiError::from(catnote_core::Error::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catnote_core::{Error, ScopeError};

    fn status_of(err: Error) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(Error::ScopeResolution(ScopeError::MissingHeader(
                "CategoryId".into()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::ScopeResolution(ScopeError::UnknownCategory(9))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::InvalidInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::NotFound("job".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(Error::Persistence("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(Error::Internal("oops".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_scope_error_message_is_kept() {
        match ApiError::from(ScopeError::UnknownCategory(9)) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "category 9 not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
