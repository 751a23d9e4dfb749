//! Application error types.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use keystile_core::auth::AuthError;
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Detail sent for every token rejection, whatever the underlying cause.
pub const INVALID_TOKEN_DETAIL: &str = "Invalid or Expired token";

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// Token rejected; the wrapped cause is for server-side logs only.
    #[error("Forbidden: {0}")]
    InvalidToken(AuthError),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "invalid_credentials",
                "Invalid Credentials",
            ),
            AppError::NotAuthenticated(_) => (
                StatusCode::UNAUTHORIZED,
                "not_authenticated",
                "Not authenticated",
            ),
            AppError::InvalidToken(_) => (StatusCode::FORBIDDEN, "forbidden", INVALID_TOKEN_DETAIL),
            AppError::Internal(msg) => {
                error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            detail: detail.to_string(),
        });
        let mut response = (status, body).into_response();
        if matches!(self, AppError::NotAuthenticated(_)) {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.is_token_rejection() {
            return AppError::InvalidToken(e);
        }
        match e {
            AuthError::AuthenticationFailed => AppError::InvalidCredentials,
            other => AppError::Internal(other.to_string()),
        }
    }
}
