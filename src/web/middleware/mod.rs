//! Middleware for the web layer.

pub mod auth;
pub mod security;

pub use auth::{basic_auth, BasicCredentials};
pub use security::security_headers;
