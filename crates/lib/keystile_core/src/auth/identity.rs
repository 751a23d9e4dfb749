//! Identity store — decides whether a username/password pair may be issued a token.

use std::fmt;

use tracing::debug;

use super::AuthError;
use super::password::PasswordHash;

/// How the configured password is held.
#[derive(Clone, PartialEq, Eq)]
pub enum StoredPassword {
    /// Compared by plain equality.
    Plain(String),
    /// A bcrypt hash, checked with [`PasswordHash::matches`].
    Bcrypt(PasswordHash),
}

impl fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredPassword::Plain(_) => f.write_str("Plain(<redacted>)"),
            StoredPassword::Bcrypt(_) => f.write_str("Bcrypt(<redacted>)"),
        }
    }
}

/// A single subject allowed to log in.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub password: StoredPassword,
}

impl Identity {
    pub fn new(username: impl Into<String>, password: StoredPassword) -> Result<Self, AuthError> {
        let username = username.into();
        if username.is_empty() {
            return Err(AuthError::Config("identity username must not be empty".into()));
        }
        Ok(Self { username, password })
    }

    /// Build an identity from optional plaintext / bcrypt settings.
    ///
    /// A bcrypt hash wins when both are present; it must parse, so a broken
    /// `AUTH_PASSWORD_HASH` fails here instead of on every login.
    pub fn from_settings(
        username: Option<String>,
        password: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Self, AuthError> {
        let username = username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AuthError::Config("no login username configured".into()))?;
        let password = match (password_hash.filter(|h| !h.trim().is_empty()), password) {
            (Some(hash), _) => StoredPassword::Bcrypt(PasswordHash::parse(&hash)?),
            (None, Some(plain)) if !plain.is_empty() => StoredPassword::Plain(plain),
            _ => {
                return Err(AuthError::Config(format!(
                    "no password or password hash configured for '{username}'"
                )));
            }
        };
        Self::new(username, password)
    }
}

/// Source of truth for login credentials.
pub trait IdentityStore: Send + Sync {
    /// Check a username/password pair, returning the subject to issue a token for.
    fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;
}

/// Identity store backed by exactly one configured identity.
#[derive(Debug, Clone)]
pub struct StaticIdentityStore {
    identity: Identity,
}

impl StaticIdentityStore {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl IdentityStore for StaticIdentityStore {
    fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let password_ok = match &self.identity.password {
            StoredPassword::Plain(expected) => expected == password,
            StoredPassword::Bcrypt(hash) => hash.matches(password)?,
        };
        if username != self.identity.username || !password_ok {
            debug!(username, "login rejected");
            return Err(AuthError::AuthenticationFailed);
        }
        Ok(self.identity.username.clone())
    }
}
