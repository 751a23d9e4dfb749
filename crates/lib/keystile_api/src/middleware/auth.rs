//! Authentication middleware — Bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use keystile_core::models::auth::VerifiedSubject;

use crate::AppState;
use crate::error::AppError;
use crate::services::auth::authenticate_token;

/// Key used to store the verified subject in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub VerifiedSubject);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::NotAuthenticated("missing authorization header".into()))?;

    let token = bearer_token(header)
        .ok_or_else(|| AppError::NotAuthenticated("invalid authorization scheme".into()))?;

    let user = authenticate_token(&state.credentials, token)?;
    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Pull the credential out of a `Bearer` header value. The scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
