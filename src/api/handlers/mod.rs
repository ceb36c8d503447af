//! API Handlers

pub mod auth;
pub mod directory;
pub mod health;
pub mod profile;

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use crate::api::dto::ApiResponse;
use crate::domain::DomainError;

/// Map a domain error onto an HTTP reply.
///
/// Store/storage detail is logged, never surfaced; constraint violations
/// count as validation failures (400).
pub(crate) fn error_reply<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let (status, message) = match &err {
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        DomainError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        DomainError::Storage(detail) => {
            error!("storage failure: {}", detail);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(ApiResponse::error(message)))
}

pub(crate) fn bad_request<T>(message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

pub(crate) fn unauthenticated<T>() -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Authentication failed")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_opaque_to_clients() {
        let (status, Json(body)) =
            error_reply::<()>(DomainError::Storage("UNIQUE constraint failed".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn conflict_maps_to_bad_request() {
        let (status, Json(body)) =
            error_reply::<()>(DomainError::Conflict("Email already registered".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("Email already registered"));
    }
}
