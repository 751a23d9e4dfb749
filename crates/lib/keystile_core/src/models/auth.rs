//! Authentication domain models.
//!
//! These are internal domain models, distinct from the HTTP response bodies
//! in `keystile_api::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (standard JWT `sub` claim).
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// The principal recovered from a token that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSubject {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
