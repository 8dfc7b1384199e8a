//! HTTP shell: function catalog and invocation over JSON.

mod handlers;
pub mod routes;
mod state;

use std::io;
use std::net::{IpAddr, SocketAddr};

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;
use crate::dispatch::Dispatcher;

pub use handlers::{FunctionsResponse, HealthResponse};
pub use state::AppState;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}")]
    #[diagnostic(
        code(taskbridge::api::bind),
        help("Is another process using this port? Set TASKBRIDGE_PORT to pick another.")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("API server error: {0}")]
    #[diagnostic(code(taskbridge::api::serve))]
    Serve(#[source] io::Error),
}

/// API server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

/// Initialize tracing subscriber with env filter
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the API server until `shutdown` is cancelled
pub async fn run(
    config: Config,
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
) -> Result<(), ApiError> {
    let app = routes::create_router(AppState::new(dispatcher)).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ApiError::Bind { addr, source })?;
    info!("API server listening on http://{}", addr);
    info!("Available functions: http://{}/functions", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(ApiError::Serve)?;

    info!("API server stopped");
    Ok(())
}
