//! Signing secret resolution.

use std::path::{Path, PathBuf};

use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use tracing::{info, warn};

/// Length of generated secrets, in alphanumeric characters.
const GENERATED_SECRET_LEN: usize = 64;

/// Generate a random alphanumeric signing secret.
pub fn generate_secret() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Resolve the signing secret: env var `JWT_SECRET` → `AUTH_SECRET` → persisted file.
///
/// When none is set, a fresh secret is generated and persisted so tokens
/// survive a restart.
pub fn resolve_signing_secret() -> String {
    let candidates = [
        std::env::var("JWT_SECRET").ok(),
        std::env::var("AUTH_SECRET").ok(),
    ];
    resolve_with(&candidates, &signing_secret_path())
}

/// Pick the first non-empty candidate, else read or create the secret file at `path`.
pub fn resolve_with(candidates: &[Option<String>], path: &Path) -> String {
    if let Some(secret) = candidates.iter().flatten().find(|s| !s.is_empty()) {
        return secret.clone();
    }
    if let Ok(existing) = std::fs::read_to_string(path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret = generate_secret();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match std::fs::write(path, &secret) {
        Ok(()) => info!(path = %path.display(), "generated new signing secret"),
        Err(e) => warn!(path = %path.display(), "could not persist signing secret: {e}"),
    }
    secret
}

/// Path to the persisted signing secret file.
pub fn signing_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keystile")
        .join("jwt-secret")
}
