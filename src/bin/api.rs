//! Taskbridge HTTP gateway binary.
//!
//! Builds the upstream client from configuration, checks that the upstream
//! answers, then serves the function catalog over HTTP.

use clap::Parser;
use miette::Diagnostic;
use taskbridge::api::{self, ApiError, Config};
use taskbridge::config::{self, AppConfig, ConfigError, GatewayArgs};
use taskbridge::dispatch::Dispatcher;
use taskbridge::upstream::{GatewayError, UpstreamClient};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Upstream API unavailable: {0}")]
    #[diagnostic(
        code(taskbridge::binary::upstream),
        help("Start the upstream API or point TASKBRIDGE_UPSTREAM_URL at it.")
    )]
    Upstream(#[from] GatewayError),

    #[error("API server error: {0}")]
    #[diagnostic(code(taskbridge::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "taskbridge-api")]
#[command(author, version, about = "Taskbridge HTTP gateway", long_about = None)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    config::load_dotenv()?;
    let cli = Cli::parse();
    run(cli).await.map_err(Into::into)
}

async fn run(cli: Cli) -> Result<(), BinaryError> {
    let config = AppConfig::from_args(cli.gateway)?;
    api::init_tracing(config.log_level);

    let _ = rustls::crypto::ring::default_provider().install_default();

    info!(
        environment = ?config.environment,
        upstream = %config.upstream.base_url,
        "Starting gateway"
    );

    let client = UpstreamClient::new(config.upstream)?;
    if let Err(e) = client.health_check().await {
        error!(error = %e, "upstream health check failed");
        return Err(e.into());
    }
    info!("Upstream API is healthy");

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal.cancel();
        }
    });

    api::run(
        Config {
            host: config.host,
            port: config.port,
        },
        Dispatcher::new(client),
        shutdown,
    )
    .await?;

    Ok(())
}
