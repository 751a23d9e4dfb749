//! # keystile_api
//!
//! HTTP API library for Keystile: a form login that issues bearer tokens and
//! a protected route that requires one.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use keystile_core::auth::identity::{IdentityStore, StaticIdentityStore};
use keystile_core::auth::jwt::CredentialService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, hello, protected};

/// Route paths.
pub mod routes {
    pub const GET_ROOT: &str = "/";
    pub const POST_LOGIN: &str = "/login";
    pub const GET_PROTECTED: &str = "/protected";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Token issuer/verifier, built once from the configured secret and TTL.
    pub credentials: Arc<CredentialService>,
    /// Decides which username/password pairs may log in.
    pub identities: Arc<dyn IdentityStore>,
}

impl AppState {
    /// Build state from configuration, using the configured identity as the only login.
    pub fn from_config(config: ApiConfig) -> Self {
        let credentials = Arc::new(CredentialService::new(config.credential_config));
        let identities = Arc::new(StaticIdentityStore::new(config.identity));
        Self {
            credentials,
            identities,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_ROOT, get(hello::hello_world))
        .route(routes::POST_LOGIN, post(auth::login_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::GET_PROTECTED, get(protected::protected_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
