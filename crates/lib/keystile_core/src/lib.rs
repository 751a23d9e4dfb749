//! # keystile_core
//!
//! Credential issuance and verification for Keystile.

pub mod auth;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
