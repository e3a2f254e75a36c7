//! Router configuration for the web layer.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, download_file, list_files, preview_raw, preview_type, rename_file, upload_file,
    AppState,
};
use super::middleware::{basic_auth, security_headers, BasicCredentials};

/// Upload page.
pub const UPLOAD_PAGE: &str = "upload.html";
/// File listing page.
pub const FILES_PAGE: &str = "files.html";
/// Preview page.
pub const PREVIEW_PAGE: &str = "preview.html";

/// Create the main router.
///
/// Every file operation sits behind the Basic auth gate; the HTML pages and
/// the health check are public.
pub fn create_router(
    app_state: Arc<AppState>,
    credentials: Arc<BasicCredentials>,
    static_path: impl AsRef<Path>,
) -> Router {
    let upload_limit = app_state.max_upload_size;

    let protected_routes = Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/files", get(list_files))
        .route(
            "/files/:filename",
            get(download_file).delete(delete_file).put(rename_file),
        )
        .route("/preview/type/:filename", get(preview_type))
        .route("/preview/raw/:filename", get(preview_raw))
        .route_layer(middleware::from_fn_with_state(credentials, basic_auth))
        .with_state(app_state);

    Router::new()
        .merge(create_page_router(static_path))
        .merge(create_health_router())
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(security_headers)),
        )
}

/// Create the router serving the static HTML pages.
pub fn create_page_router(static_path: impl AsRef<Path>) -> Router {
    let dir = static_path.as_ref();

    Router::new()
        .route_service("/", ServeFile::new(dir.join(UPLOAD_PAGE)))
        .route_service("/list", ServeFile::new(dir.join(FILES_PAGE)))
        .route_service("/preview/:filename", ServeFile::new(dir.join(PREVIEW_PAGE)))
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Turn a handler panic into a plain-text 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Internal Server Error",
    )
        .into_response()
}
