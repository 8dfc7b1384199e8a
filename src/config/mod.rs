//! Gateway configuration.
//!
//! Every setting can come from a flag, a `TASKBRIDGE_*` environment
//! variable, or a `.env` file in the working directory (flag wins).

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use clap::builder::FalseyValueParser;
use clap::{Args, ValueEnum};
use miette::Diagnostic;
use reqwest::Url;
use thiserror::Error;
use uuid::Uuid;

use crate::upstream::UpstreamConfig;

#[cfg(test)]
mod mod_test;

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:3006/api/claude";

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No upstream API key configured")]
    #[diagnostic(
        code(taskbridge::config::missing_api_key),
        help("Set TASKBRIDGE_API_KEY or pass --api-key.")
    )]
    MissingApiKey,

    #[error("Invalid upstream URL '{url}': {reason}")]
    #[diagnostic(
        code(taskbridge::config::invalid_upstream_url),
        help("Use an absolute http(s) URL such as http://localhost:3006/api/claude.")
    )]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("Invalid default project ID '{value}'")]
    #[diagnostic(
        code(taskbridge::config::invalid_project_id),
        help("TASKBRIDGE_PROJECT_ID must be a UUID like 550e8400-e29b-41d4-a716-446655440000.")
    )]
    InvalidProjectId { value: String },

    #[error("Failed to load {path}: {reason}")]
    #[diagnostic(
        code(taskbridge::config::dotenv),
        help("Each line must be KEY=value; quote values containing spaces.")
    )]
    Dotenv { path: String, reason: String },

    #[error("Upstream timeout must be at least one second")]
    #[diagnostic(code(taskbridge::config::invalid_timeout))]
    InvalidTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Default filter directive when `RUST_LOG` is unset.
    pub fn directive(self) -> String {
        format!("taskbridge={level},tower_http={level}", level = self.as_str())
    }
}

/// Settings shared by the gateway binaries, flattened into each one's CLI.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Deployment environment
    #[arg(long, env = "TASKBRIDGE_ENVIRONMENT", value_enum, default_value_t = Environment::Local)]
    pub environment: Environment,

    /// Base URL of the upstream API
    #[arg(long, env = "TASKBRIDGE_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// API key sent upstream as X-API-Key
    #[arg(long, env = "TASKBRIDGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Project used when a project-scoped call omits projectId
    #[arg(long, env = "TASKBRIDGE_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Host address to bind to
    #[arg(long, env = "TASKBRIDGE_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "TASKBRIDGE_PORT", default_value_t = 3010)]
    pub port: u16,

    /// Log level
    #[arg(long, env = "TASKBRIDGE_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Upstream call timeout in seconds
    #[arg(long, env = "TASKBRIDGE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Send the type discriminator when creating epics
    #[arg(long, env = "TASKBRIDGE_SEND_EPIC_TYPE", value_parser = FalseyValueParser::new())]
    pub send_epic_type: bool,
}

/// Validated gateway configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    pub log_level: LogLevel,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_args(args: GatewayArgs) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let url = Url::parse(&args.upstream_url).map_err(|e| ConfigError::InvalidUpstreamUrl {
            url: args.upstream_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUpstreamUrl {
                url: args.upstream_url,
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let default_project_id = args
            .project_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(|id| {
                if id.len() == 36 && Uuid::try_parse(&id).is_ok() {
                    Ok(id)
                } else {
                    Err(ConfigError::InvalidProjectId { value: id })
                }
            })
            .transpose()?;

        if args.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(Self {
            environment: args.environment,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            upstream: UpstreamConfig {
                base_url: args.upstream_url,
                api_key,
                timeout: Duration::from_secs(args.timeout_secs),
                default_project_id,
                send_epic_type: args.send_epic_type,
            },
        })
    }
}

/// Load `.env` from the working directory, if present.
///
/// Call before parsing arguments so its values feed the `env` fallbacks.
pub fn load_dotenv() -> Result<(), ConfigError> {
    dotenv_result(dotenvy::dotenv().map(|_| ()), Path::new(".env"))
}

/// Load a specific env file. A missing file is not an error.
pub fn load_dotenv_from(path: &Path) -> Result<(), ConfigError> {
    dotenv_result(dotenvy::from_path(path), path)
}

fn dotenv_result(result: Result<(), dotenvy::Error>, path: &Path) -> Result<(), ConfigError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Dotenv {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}
