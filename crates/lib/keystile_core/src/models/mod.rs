//! Domain models shared by the API and CLI crates.

pub mod auth;
