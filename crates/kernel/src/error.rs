//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the content API handlers.
///
/// Every client-facing variant is a 404 with a fixed message; store failures
/// are 500s and never leak details to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid post type")]
    InvalidPostType,

    #[error("Post not found")]
    PostNotFound,

    #[error("Post mismatch")]
    PostMismatch,

    #[error("No route was found matching the URL and request method")]
    NoRoute,

    #[error("internal server error")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Machine-readable error code carried in the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPostType => "invalid_post_type",
            ApiError::PostNotFound => "post_not_found",
            ApiError::PostMismatch => "post_mismatch",
            ApiError::NoRoute => "rest_no_route",
            ApiError::Store(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::NOT_FOUND,
        }
    }
}

/// JSON error envelope: `{code, message, data: {status}}`.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    code: &'static str,
    message: String,
    data: ErrorData,
}

#[derive(Debug, Serialize)]
struct ErrorData {
    status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Store(e) = &self {
            tracing::error!(error = %e, "content store error");
        }

        let envelope = ErrorEnvelope {
            code: self.code(),
            message: self.to_string(),
            data: ErrorData {
                status: status.as_u16(),
            },
        };

        (status, Json(envelope)).into_response()
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_share_status() {
        for err in [
            ApiError::InvalidPostType,
            ApiError::PostNotFound,
            ApiError::PostMismatch,
            ApiError::NoRoute,
        ] {
            assert_eq!(err.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn store_errors_are_internal() {
        let err = ApiError::from(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "internal_error");
        // Details stay in the logs.
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn messages_are_fixed() {
        assert_eq!(ApiError::InvalidPostType.to_string(), "Invalid post type");
        assert_eq!(ApiError::PostNotFound.to_string(), "Post not found");
        assert_eq!(ApiError::PostMismatch.to_string(), "Post mismatch");
    }
}
