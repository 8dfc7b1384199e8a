//! Taskbridge MCP gateway binary (stdio transport).

use clap::Parser;
use miette::Diagnostic;
use taskbridge::config::{self, AppConfig, ConfigError, GatewayArgs};
use taskbridge::dispatch::Dispatcher;
use taskbridge::mcp::{self, McpServeError};
use taskbridge::upstream::{GatewayError, UpstreamClient};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build upstream client: {0}")]
    #[diagnostic(code(taskbridge::binary::upstream))]
    Upstream(#[from] GatewayError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Mcp(#[from] McpServeError),
}

#[derive(Parser)]
#[command(name = "taskbridge-mcp")]
#[command(author, version, about = "Taskbridge MCP gateway over stdio", long_about = None)]
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
    mcp::init_tracing(config.log_level);

    let _ = rustls::crypto::ring::default_provider().install_default();

    let client = UpstreamClient::new(config.upstream)?;
    // Tools still list without the upstream, so only warn
    match client.health_check().await {
        Ok(_) => info!("Upstream API is healthy"),
        Err(e) => warn!(error = %e, "upstream health check failed"),
    }

    mcp::serve_stdio(Dispatcher::new(client)).await?;
    Ok(())
}
