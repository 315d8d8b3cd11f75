//!
//! Ratchet Server - HTTP API for the Ratchet workflow engine
//!
//! Thin transport layer over `ratchet-core`: routing, request/response
//! shaping, and configuration. All business decisions live in the core.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// API routes and handlers
pub mod api;

/// Server configuration
pub mod config;

/// Server error types
pub mod error;

/// Server composition root
pub mod server;

use std::sync::Arc;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::RatchetServer;

/// Bind the listener and serve the API until the process exits.
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let addr = config.listen_addr();
    let server = Arc::new(RatchetServer::new(config));
    let router = api::build_router(server);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "ratchet server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
