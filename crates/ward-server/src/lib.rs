//! HTTP API for Ward documentation.
//!
//! Serves the documentation tree as JSON:
//! - `GET /api/docs/categories` - every category with its file listing
//! - `GET /api/docs/category?category=` - one category and its rendered landing page
//! - `GET /api/docs/file?category=&file=` - one rendered file, with `ETag`
//! - `POST /api/docs/cache/invalidate` - drop the cached scan
//! - `GET /api/retrieve?file=` - allowlisted static files
//!
//! # Quick Start
//!
//! ```ignore
//! use ward_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server(ServerConfig::default()).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use state::{AppState, RetrieveState};
use ward_docs::{DocsLibrary, LibraryConfig};
use ward_storage::{FsStorage, Storage};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Documentation source directory.
    pub source_dir: PathBuf,
    /// Cache scan results between requests.
    pub cache_enabled: bool,
    /// Lifetime of a cached scan.
    pub cache_ttl: Duration,
    /// Directory served by `/api/retrieve`.
    pub assets_dir: PathBuf,
    /// Request paths `/api/retrieve` may serve.
    pub retrieve_allowed: Vec<String>,
    /// Application version, mixed into `ETag`s.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let library = LibraryConfig::default();
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("docs"),
            cache_enabled: library.cache_enabled,
            cache_ttl: library.cache_ttl,
            assets_dir: PathBuf::from("public"),
            retrieve_allowed: vec!["/legal/privacy.md".to_owned(), "/legal/terms.md".to_owned()],
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.source_dir.clone()));
    let library = DocsLibrary::new(
        storage,
        LibraryConfig {
            cache_enabled: config.cache_enabled,
            cache_ttl: config.cache_ttl,
        },
    );

    let state = Arc::new(AppState {
        library,
        retrieve: RetrieveState {
            assets_dir: config.assets_dir.clone(),
            allowed: config.retrieve_allowed.clone(),
        },
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        source_dir = %config.source_dir.display(),
        cache_enabled = config.cache_enabled,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Ward config.
#[must_use]
pub fn server_config_from_config(config: &ward_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        cache_enabled: config.docs_resolved.cache_enabled,
        cache_ttl: config.docs_resolved.cache_ttl,
        assets_dir: config.retrieve_resolved.assets_dir.clone(),
        retrieve_allowed: config.retrieve_resolved.allowed.clone(),
        version,
    }
}
