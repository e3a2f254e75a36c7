//! Test helpers for web API tests.
//!
//! Provides a TestServer over a temporary storage directory and Basic
//! credential helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderValue;
use axum_test::TestServer;
use base64::Engine;
use tempfile::TempDir;

use fileshelf::web::handlers::AppState;
use fileshelf::web::middleware::BasicCredentials;
use fileshelf::web::router::create_router;
use fileshelf::FileStorage;

/// Username accepted by test servers.
pub const USERNAME: &str = "admin";
/// Password accepted by test servers.
pub const PASSWORD: &str = "correct-horse";
/// Realm announced by test servers.
pub const REALM: &str = "restricted";

/// A running test server and the directory it stores files in.
pub struct TestContext {
    pub server: TestServer,
    /// Root of the temporary tree; storage lives in `files/` below it.
    pub root: TempDir,
}

impl TestContext {
    /// Storage directory used by the server.
    pub fn storage_path(&self) -> PathBuf {
        self.root.path().join("files")
    }

    /// Put a file straight into the storage directory.
    pub fn write_file(&self, name: &str, content: &[u8]) {
        std::fs::write(self.storage_path().join(name), content).expect("Failed to write file");
    }

    /// Read a file straight from the storage directory.
    pub fn read_file(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.storage_path().join(name)).expect("Failed to read file")
    }

    /// Check whether a path exists in the storage directory.
    pub fn file_exists(&self, name: &str) -> bool {
        self.storage_path().join(name).exists()
    }
}

/// Directory containing the real HTML pages.
pub fn static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Create a test server with default settings.
pub fn create_test_server() -> TestContext {
    create_test_server_with(|state| state)
}

/// Create a test server, letting the caller adjust the handler state.
pub fn create_test_server_with(configure: impl FnOnce(AppState) -> AppState) -> TestContext {
    let root = TempDir::new().expect("Failed to create temp dir");
    let storage_path = root.path().join("files");
    std::fs::create_dir_all(&storage_path).expect("Failed to create storage dir");

    let app_state = Arc::new(configure(AppState::new(FileStorage::new(&storage_path))));
    let credentials = Arc::new(BasicCredentials::new(USERNAME, PASSWORD, REALM));

    let router = create_router(app_state, credentials, static_dir());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext { server, root }
}

/// Build a Basic `Authorization` header value.
pub fn basic_header(username: &str, password: &str) -> HeaderValue {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    HeaderValue::from_str(&format!("Basic {encoded}")).expect("Invalid header value")
}

/// Header carrying the accepted test credential.
pub fn auth() -> HeaderValue {
    basic_header(USERNAME, PASSWORD)
}
