//! Request handlers.

pub mod auth;
pub mod hello;
pub mod protected;
