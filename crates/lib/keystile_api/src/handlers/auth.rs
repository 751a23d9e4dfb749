//! Login request handler.

use axum::extract::State;
use axum::{Form, Json};

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LoginRequest, TokenResponse};
use crate::services::auth;

/// `POST /login` — form-encoded username + password, answered with a bearer token.
pub async fn login_handler(
    State(state): State<AppState>,
    Form(body): Form<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(
        state.identities.as_ref(),
        &state.credentials,
        &body.username,
        &body.password,
    )?;
    Ok(Json(resp))
}
