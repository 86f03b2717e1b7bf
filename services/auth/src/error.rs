//! Custom error types for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing, invalid, expired or revoked credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource does not exist
    #[error("Not found")]
    NotFound,

    /// Too many login attempts
    #[error("Too many requests")]
    TooManyRequests,

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AuthError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AuthError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, try again later".to_string(),
            ),
            AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
