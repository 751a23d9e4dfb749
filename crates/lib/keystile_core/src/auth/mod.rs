//! Authentication logic.
//!
//! Provides access token issuance and verification, the identity store that
//! authorizes issuance, password hashing, and signing secret resolution.
//! Shared by `keystile_api` and `keystile_cli`.

pub mod identity;
pub mod jwt;
pub mod password;
pub mod secret;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Token signature does not verify")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for the failures `verify` can produce for a presented token.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed(_)
        )
    }

    /// Short machine-readable name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::Malformed(_) => "malformed",
            AuthError::Config(_) => "config",
            AuthError::Internal(_) => "internal",
        }
    }
}
