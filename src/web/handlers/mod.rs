//! API handlers and shared handler state.

pub mod file;

pub use file::*;

use axum::{
    extract::{rejection::RawPathParamsRejection, FromRequestParts, RawPathParams},
    http::request::Parts,
};

use crate::config::Config;
use crate::file::{FileName, FileStorage};
use crate::web::error::ApiError;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage directory.
    pub storage: FileStorage,
    /// Maximum accepted upload body in bytes.
    pub max_upload_size: usize,
    /// Answer uploads with `303 See Other` to `/` rather than a text message.
    pub upload_redirect: bool,
}

impl AppState {
    /// Create state with default upload settings (50 MiB, redirect).
    pub fn new(storage: FileStorage) -> Self {
        Self {
            storage,
            max_upload_size: 50 * 1024 * 1024,
            upload_redirect: true,
        }
    }

    /// Build state from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(FileStorage::new(&config.storage.path))
            .with_max_upload_size(config.storage.max_upload_size_bytes())
            .with_upload_redirect(config.web.upload_redirect)
    }

    /// Set the upload size limit in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Choose between redirect and plain-text upload responses.
    pub fn with_upload_redirect(mut self, redirect: bool) -> Self {
        self.upload_redirect = redirect;
        self
    }
}

/// Extractor for the `{filename}` path segment.
///
/// The segment is percent-decoded exactly once (by the router) and validated
/// with [`FileName::parse`], so every filename route shares the same rules.
#[derive(Debug, Clone)]
pub struct FileNameParam(pub FileName);

impl<S> FromRequestParts<S> for FileNameParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // Captures are percent-decoded by the router; invalid UTF-8 is rejected there.
            let params = RawPathParams::from_request_parts(parts, state)
                .await
                .map_err(|e| match e {
                    RawPathParamsRejection::InvalidUtf8InPathParam(_) => {
                        ApiError::bad_request("Invalid filename encoding")
                    }
                    _ => ApiError::bad_request("Missing filename"),
                })?;

            let decoded = params
                .iter()
                .find(|(key, _)| *key == "filename")
                .map(|(_, value)| value)
                .ok_or_else(|| ApiError::bad_request("Missing filename"))?;

            let name = FileName::parse(decoded).map_err(|e| {
                tracing::warn!("Rejected filename: {}", e);
                ApiError::bad_request("Invalid filename")
            })?;

            Ok(FileNameParam(name))
        })
    }
}
