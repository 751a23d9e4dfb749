//! Authentication service — the login flow delegating to `keystile_core::auth`.

use keystile_core::auth::identity::IdentityStore;
use keystile_core::auth::jwt::CredentialService;
use keystile_core::models::auth::VerifiedSubject;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;

/// Check a username/password pair and issue an access token for it.
pub fn login(
    identities: &dyn IdentityStore,
    credentials: &CredentialService,
    username: &str,
    password: &str,
) -> AppResult<TokenResponse> {
    let subject = identities.authenticate(username, password).map_err(|e| {
        warn!(username, reason = e.kind(), "login failed");
        AppError::from(e)
    })?;

    let access_token = credentials.issue(&subject)?;
    info!(subject = %subject, "issued access token");

    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: credentials.ttl().num_seconds(),
    })
}

/// Verify a presented bearer token.
///
/// Every rejection collapses into [`AppError::InvalidToken`]; the specific
/// cause is logged here and carried inside the error, never sent to the client.
pub fn authenticate_token(credentials: &CredentialService, token: &str) -> AppResult<VerifiedSubject> {
    credentials.verify(token).map_err(|e| {
        warn!(reason = e.kind(), "rejected bearer token: {e}");
        AppError::from(e)
    })
}
