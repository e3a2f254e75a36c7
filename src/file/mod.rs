//! File management module for fileshelf.
//!
//! This module provides:
//! - Filename validation against path traversal
//! - Flat-directory file storage
//! - Media type inference from file extensions

mod name;
mod storage;

pub use name::{FileName, MAX_FILENAME_BYTES};
pub use storage::FileStorage;

/// Media type used when the extension is unknown.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Infer a media type from a filename's extension.
///
/// Unknown or missing extensions yield [`FALLBACK_MEDIA_TYPE`].
pub fn media_type_for(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
