//! HTTP Basic authentication gate.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::web::error::ApiError;

/// The single credential pair every protected request must carry.
#[derive(Clone)]
pub struct BasicCredentials {
    username: String,
    password: String,
    realm: String,
}

impl BasicCredentials {
    /// Create credentials for the given realm.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        realm: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            realm: realm.into(),
        }
    }

    /// Build from the `[auth]` configuration section.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.username, &config.password, &config.realm)
    }

    /// Realm named in the challenge.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Exact byte-for-byte comparison of both fields.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username.as_bytes() == username.as_bytes()
            && self.password.as_bytes() == password.as_bytes()
    }
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("realm", &self.realm)
            .finish_non_exhaustive()
    }
}

/// Middleware rejecting requests without the configured Basic credential.
///
/// A missing, malformed or wrong `Authorization` header yields 401 with a
/// `WWW-Authenticate` challenge and the wrapped handler is never called.
pub async fn basic_auth(
    State(credentials): State<Arc<BasicCredentials>>,
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match auth_header {
        Some(TypedHeader(Authorization(basic)))
            if credentials.matches(basic.username(), basic.password()) =>
        {
            Ok(next.run(request).await)
        }
        Some(TypedHeader(Authorization(basic))) => {
            tracing::warn!(
                username = basic.username(),
                path = %request.uri().path(),
                "Rejected Basic credentials"
            );
            Err(ApiError::unauthorized(credentials.realm()))
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "Missing or malformed Basic credentials");
            Err(ApiError::unauthorized(credentials.realm()))
        }
    }
}
