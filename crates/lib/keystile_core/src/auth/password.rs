//! bcrypt password hashes for configured identities.

use std::fmt;

use super::AuthError;

/// bcrypt cost factor for newly generated hashes.
const BCRYPT_COST: u32 = 10;

/// A bcrypt hash that bcrypt has already parsed successfully once.
///
/// Built either by hashing a plaintext ([`PasswordHash::generate`]) or by
/// accepting an existing hash from configuration ([`PasswordHash::parse`]),
/// so a broken hash is a startup error rather than a failure on every login.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password.
    pub fn generate(password: &str) -> Result<Self, AuthError> {
        bcrypt::hash(password, BCRYPT_COST)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }

    /// Accept a configured hash, rejecting anything bcrypt cannot parse.
    pub fn parse(hash: &str) -> Result<Self, AuthError> {
        let hash = hash.trim();
        bcrypt::verify("", hash)
            .map_err(|e| AuthError::Config(format!("invalid bcrypt password hash: {e}")))?;
        Ok(Self(hash.to_string()))
    }

    /// Check a plaintext password against this hash.
    pub fn matches(&self, password: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, &self.0)
            .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
