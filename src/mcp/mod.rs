//! Model Context Protocol (MCP) server over stdio
//!
//! stdout carries the protocol, so logs go to stderr.

pub mod server;


use miette::Diagnostic;
use rmcp::ServiceExt;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;
use crate::dispatch::Dispatcher;

pub use server::McpServer;

#[derive(Error, Diagnostic, Debug)]
pub enum McpServeError {
    #[error("MCP session failed to initialize: {0}")]
    #[diagnostic(code(taskbridge::mcp::initialize))]
    Initialize(String),

    #[error("MCP session ended abnormally: {0}")]
    #[diagnostic(code(taskbridge::mcp::session))]
    Session(#[from] tokio::task::JoinError),
}

/// Initialize tracing to stderr with env filter
pub fn init_tracing(level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.directive().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init();
}

/// Serve MCP on stdin/stdout until the client disconnects
pub async fn serve_stdio(dispatcher: Dispatcher) -> Result<(), McpServeError> {
    info!("MCP server starting (stdio transport)");

    let service = McpServer::new(dispatcher)
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| McpServeError::Initialize(e.to_string()))?;
    let reason = service.waiting().await?;

    info!(?reason, "MCP session closed");
    Ok(())
}
