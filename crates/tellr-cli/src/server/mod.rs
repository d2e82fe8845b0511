//! HTTP server startup and graceful shutdown.

mod http_server;
mod lifecycle;
mod shutdown;

use std::io;

use axum::Router;

use self::http_server::serve_http;
use crate::config::ServerConfig;

/// Binds the configured address and serves `app` until a shutdown signal.
pub async fn serve(app: Router, config: ServerConfig) -> io::Result<()> {
    serve_http(app, config).await
}
