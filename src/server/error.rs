//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::Error;

/// Error returned from route handlers.
///
/// Wraps the domain [`Error`] and maps it onto a status code and a
/// `{"detail": ...}` JSON body. Validation and not-found errors pass their
/// message through; store failures get a generic client message with the
/// detail kept server-side in the log.
#[derive(Debug)]
pub struct ApiError(Error);

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::NotFound => (StatusCode::NOT_FOUND, "Log not found".to_string()),
            Error::Storage(detail) => {
                tracing::error!(error = %detail, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_validation_error_to_400() {
        let response =
            ApiError(Error::validation("Message must be at least 3 characters")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn should_map_not_found_to_404() {
        let response = ApiError(Error::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_storage_error_to_500() {
        let response = ApiError(Error::Storage("connection refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
