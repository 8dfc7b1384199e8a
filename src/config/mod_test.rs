use std::env;
use std::time::Duration;

use clap::Parser;
use serial_test::serial;

use super::{
    AppConfig, ConfigError, DEFAULT_UPSTREAM_URL, Environment, GatewayArgs, LogLevel,
    load_dotenv_from,
};

const VARS: &[&str] = &[
    "TASKBRIDGE_ENVIRONMENT",
    "TASKBRIDGE_UPSTREAM_URL",
    "TASKBRIDGE_API_KEY",
    "TASKBRIDGE_PROJECT_ID",
    "TASKBRIDGE_HOST",
    "TASKBRIDGE_PORT",
    "TASKBRIDGE_LOG_LEVEL",
    "TASKBRIDGE_TIMEOUT_SECS",
    "TASKBRIDGE_SEND_EPIC_TYPE",
];

#[derive(Parser)]
struct TestCli {
    #[command(flatten)]
    gateway: GatewayArgs,
}

fn clear_env() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn parse(args: &[&str]) -> Result<AppConfig, ConfigError> {
    let cli = TestCli::try_parse_from(std::iter::once("taskbridge").chain(args.iter().copied()))
        .expect("arguments should parse");
    AppConfig::from_args(cli.gateway)
}

#[test]
#[serial]
fn test_defaults() {
    clear_env();

    let config = parse(&["--api-key", "secret"]).unwrap();

    assert_eq!(config.environment, Environment::Local);
    assert_eq!(config.host.to_string(), "0.0.0.0");
    assert_eq!(config.port, 3010);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.upstream.base_url, DEFAULT_UPSTREAM_URL);
    assert_eq!(config.upstream.api_key, "secret");
    assert_eq!(config.upstream.timeout, Duration::from_secs(30));
    assert_eq!(config.upstream.default_project_id, None);
    assert!(!config.upstream.send_epic_type);
}

#[test]
#[serial]
fn test_env_vars_are_read() {
    clear_env();
    unsafe {
        env::set_var("TASKBRIDGE_API_KEY", "from-env");
        env::set_var("TASKBRIDGE_ENVIRONMENT", "production");
        env::set_var("TASKBRIDGE_PORT", "4000");
        env::set_var("TASKBRIDGE_LOG_LEVEL", "debug");
        env::set_var("TASKBRIDGE_SEND_EPIC_TYPE", "true");
        env::set_var("TASKBRIDGE_PROJECT_ID", "550e8400-e29b-41d4-a716-446655440000");
    }

    let config = parse(&[]).unwrap();

    assert_eq!(config.upstream.api_key, "from-env");
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.port, 4000);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.upstream.send_epic_type);
    assert_eq!(
        config.upstream.default_project_id.as_deref(),
        Some("550e8400-e29b-41d4-a716-446655440000")
    );

    clear_env();
}

#[test]
#[serial]
fn test_flags_override_env() {
    clear_env();
    unsafe {
        env::set_var("TASKBRIDGE_API_KEY", "from-env");
        env::set_var("TASKBRIDGE_PORT", "4000");
        env::set_var("TASKBRIDGE_SEND_EPIC_TYPE", "false");
    }

    let config = parse(&["--api-key", "from-flag", "--port", "5000"]).unwrap();

    assert_eq!(config.upstream.api_key, "from-flag");
    assert_eq!(config.port, 5000);
    assert!(!config.upstream.send_epic_type);

    clear_env();
}

#[test]
#[serial]
fn test_missing_or_blank_api_key() {
    clear_env();

    assert_eq!(parse(&[]).unwrap_err(), ConfigError::MissingApiKey);
    assert_eq!(
        parse(&["--api-key", "   "]).unwrap_err(),
        ConfigError::MissingApiKey
    );
}

#[test]
#[serial]
fn test_rejects_bad_upstream_url() {
    clear_env();

    let err = parse(&["--api-key", "k", "--upstream-url", "localhost:3006"]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUpstreamUrl { .. }));

    let err = parse(&["--api-key", "k", "--upstream-url", "ftp://files.example.com"]).unwrap_err();
    assert!(err.to_string().contains("unsupported scheme 'ftp'"));
}

#[test]
#[serial]
fn test_rejects_bad_project_id() {
    clear_env();

    let err = parse(&["--api-key", "k", "--project-id", "project-1"]).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidProjectId {
            value: "project-1".to_string()
        }
    );
}

#[test]
#[serial]
fn test_blank_project_id_means_none() {
    clear_env();

    let config = parse(&["--api-key", "k", "--project-id", ""]).unwrap();
    assert_eq!(config.upstream.default_project_id, None);
}

#[test]
#[serial]
fn test_rejects_zero_timeout() {
    clear_env();

    let err = parse(&["--api-key", "k", "--timeout-secs", "0"]).unwrap_err();
    assert_eq!(err, ConfigError::InvalidTimeout);
}

#[test]
fn test_log_directive() {
    assert_eq!(LogLevel::Warn.directive(), "taskbridge=warn,tower_http=warn");
}

fn env_file(name: &str, contents: &str) -> std::path::PathBuf {
    let path = env::temp_dir().join(format!("taskbridge-{}-{name}.env", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn test_missing_env_file_is_ignored() {
    let path = env::temp_dir().join("taskbridge-does-not-exist.env");
    assert_eq!(load_dotenv_from(&path), Ok(()));
}

#[test]
#[serial]
fn test_env_file_feeds_flags() {
    clear_env();
    let path = env_file("valid", "TASKBRIDGE_API_KEY=from-file\nTASKBRIDGE_PORT=4020\n");

    load_dotenv_from(&path).unwrap();
    let config = parse(&[]).unwrap();
    std::fs::remove_file(&path).unwrap();
    clear_env();

    assert_eq!(config.upstream.api_key, "from-file");
    assert_eq!(config.port, 4020);
}

#[test]
#[serial]
fn test_malformed_env_file_is_reported() {
    clear_env();
    let path = env_file("malformed", "TASKBRIDGE_API_KEY=\"unterminated\n");

    let err = load_dotenv_from(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    clear_env();

    assert!(matches!(err, ConfigError::Dotenv { .. }));
    assert!(err.to_string().starts_with("Failed to load "));
}
