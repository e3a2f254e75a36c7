//! File handlers for the web API.

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use super::{AppState, FileNameParam};
use crate::file::{media_type_for, FileName, FALLBACK_MEDIA_TYPE};
use crate::web::error::ApiError;
use crate::ShelfError;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Query parameters for rename.
#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    /// New filename.
    pub new: Option<String>,
}

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are dropped and quotes/backslashes replaced in the
/// plain `filename` parameter; non-ASCII names also get an RFC 5987
/// `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized,
        urlencoding::encode(filename)
    )
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload exceeded size limit: {}", e);
        ApiError::payload_too_large("File too large")
    } else {
        tracing::warn!("Failed to read multipart data: {}", e);
        ApiError::bad_request("File upload error")
    }
}

/// Stream an opened file as a response body.
fn file_response(
    file: tokio::fs::File,
    size: u64,
    content_type: &str,
    disposition: Option<String>,
) -> Result<Response, ApiError> {
    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size);

    if let Some(disposition) = disposition {
        builder = builder.header(header::CONTENT_DISPOSITION, disposition);
    }

    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// POST /upload - Upload a file.
///
/// Request body: multipart/form-data with a `file` field. An existing file
/// with the same name is overwritten.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Rejected upload request: {}", e);
        ApiError::bad_request("File upload error")
    })?;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let client_name = field
            .file_name()
            .ok_or_else(|| ApiError::bad_request("File upload error"))?
            .to_string();
        let name = FileName::from_upload(&client_name).map_err(|e| {
            tracing::warn!("Rejected upload filename: {}", e);
            ApiError::bad_request("Invalid filename")
        })?;

        let mut out = state.storage.create(&name).await.map_err(|e| {
            tracing::error!("Failed to create {}: {}", name, e);
            ApiError::internal("Cannot save file")
        })?;

        // A failure below leaves a truncated file behind.
        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            out.write_all(&chunk).await.map_err(|e| {
                tracing::error!("Failed to write {}: {}", name, e);
                ApiError::internal("Error saving file")
            })?;
            size += chunk.len() as u64;
        }
        out.flush().await.map_err(|e| {
            tracing::error!("Failed to flush {}: {}", name, e);
            ApiError::internal("Error saving file")
        })?;

        tracing::info!(file = %name, bytes = size, "Uploaded file");

        let response = if state.upload_redirect {
            Redirect::to("/").into_response()
        } else {
            format!("File uploaded successfully: {} ({} bytes)", name, size).into_response()
        };
        return Ok(response);
    }

    Err(ApiError::bad_request("File upload error"))
}

/// GET /files - List stored filenames as a JSON array.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let names = state.storage.list().await.map_err(|e| {
        tracing::error!("Failed to list files: {}", e);
        ApiError::internal("Unable to read files")
    })?;

    Ok(Json(names))
}

/// GET /files/:filename - Download a file as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    FileNameParam(name): FileNameParam,
) -> Result<Response, ApiError> {
    let (file, size) = state.storage.open(&name).await?;

    file_response(
        file,
        size,
        FALLBACK_MEDIA_TYPE,
        Some(content_disposition_header(name.as_str())),
    )
}

/// DELETE /files/:filename - Delete a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    FileNameParam(name): FileNameParam,
) -> Result<String, ApiError> {
    state.storage.delete(&name).await.map_err(|e| match e {
        ShelfError::NotFound(_) => ApiError::not_found("File not found"),
        e => {
            tracing::error!("Failed to delete {}: {}", name, e);
            ApiError::internal("Unable to delete the file")
        }
    })?;

    tracing::info!(file = %name, "Deleted file");
    Ok(format!("File Deleted: {}", name))
}

/// PUT /files/:filename?new=NAME - Rename a file.
///
/// Never overwrites: an existing destination yields 409.
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    FileNameParam(old_name): FileNameParam,
    Query(query): Query<RenameQuery>,
) -> Result<String, ApiError> {
    let new_name = query
        .new
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing new name"))?;

    let new_name = FileName::parse(new_name).map_err(|e| {
        tracing::warn!("Rejected rename target: {}", e);
        ApiError::bad_request("Invalid filename")
    })?;

    state
        .storage
        .rename(&old_name, &new_name)
        .await
        .map_err(|e| match e {
            ShelfError::NotFound(_) => ApiError::not_found("Original file not found"),
            ShelfError::Conflict(_) => ApiError::conflict("New filename already exists"),
            e => {
                tracing::error!("Failed to rename {} to {}: {}", old_name, new_name, e);
                ApiError::internal("Rename failed")
            }
        })?;

    tracing::info!(from = %old_name, to = %new_name, "Renamed file");
    Ok(format!("Renamed to {}", new_name))
}

/// GET /preview/type/:filename - Inferred media type as plain text.
pub async fn preview_type(FileNameParam(name): FileNameParam) -> String {
    media_type_for(name.as_str())
}

/// GET /preview/raw/:filename - File bytes served inline with the inferred type.
pub async fn preview_raw(
    State(state): State<Arc<AppState>>,
    FileNameParam(name): FileNameParam,
) -> Result<Response, ApiError> {
    let (file, size) = state.storage.open(&name).await?;
    file_response(file, size, &media_type_for(name.as_str()), None)
}
