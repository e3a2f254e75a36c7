//! Web server for fileshelf.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::{Result, ShelfError};

use super::handlers::AppState;
use super::middleware::BasicCredentials;
use super::router::create_router;

/// Web server for the file API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Basic auth credential.
    credentials: Arc<BasicCredentials>,
    /// Directory with the HTML pages.
    static_path: PathBuf,
}

impl WebServer {
    /// Create a new web server from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                ShelfError::Config(format!(
                    "invalid listen address {}:{}: {e}",
                    config.server.host, config.server.port
                ))
            })?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::from_config(config)),
            credentials: Arc::new(BasicCredentials::from_config(&config.auth)),
            static_path: PathBuf::from(&config.web.static_path),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind the listener and prepare the storage directory.
    async fn bind(&self) -> std::io::Result<TcpListener> {
        match self.app_state.storage.ensure_dir().await {
            Ok(()) => tracing::info!(
                "Storage directory: {}",
                self.app_state.storage.base_path().display()
            ),
            Err(e) => tracing::warn!(
                "Failed to create storage directory {}: {}. Uploads will retry.",
                self.app_state.storage.base_path().display(),
                e
            ),
        }

        TcpListener::bind(self.addr).await
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        let router = create_router(self.app_state, self.credentials, &self.static_path);

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let listener = self.bind().await?;
        let local_addr = listener.local_addr()?;
        let router = create_router(self.app_state, self.credentials, &self.static_path);

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
