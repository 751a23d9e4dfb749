//! API server configuration.

use keystile_core::auth::identity::Identity;
use keystile_core::auth::jwt::CredentialConfig;

/// Configuration for the API server.
///
/// Assembled by the server binary from flags and environment variables; the
/// library never reads ambient configuration itself.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// Signing secret and token lifetime.
    pub credential_config: CredentialConfig,
    /// The identity allowed to log in.
    pub identity: Identity,
}
