//! fileshelf - minimal authenticated HTTP file shelf
//!
//! Upload, list, download, delete, rename and preview files kept in a single
//! server-side directory, behind one shared Basic-auth credential.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{Result, ShelfError};
pub use file::{media_type_for, FileName, FileStorage};
pub use web::{create_router, ApiError, WebServer};
