//! Web module for fileshelf.
//!
//! REST endpoints mapping HTTP verbs on `/files`, `/upload` and `/preview`
//! onto operations in the storage directory, plus the static UI pages.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
