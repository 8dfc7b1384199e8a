use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Failed to connect to gateway")]
    #[diagnostic(
        code(taskbridge::cli::connection_failed),
        help(
            "Is the gateway running? Try: taskbridge-api\nOr set TASKBRIDGE_GATEWAY_URL to point to the correct server."
        )
    )]
    ConnectionFailed {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from gateway: {message}")]
    #[diagnostic(
        code(taskbridge::cli::invalid_response),
        help("The gateway returned data in an unexpected format. This might indicate a version mismatch.")
    )]
    InvalidResponse { message: String },

    #[error("Gateway error ({status}): {message}")]
    #[diagnostic(code(taskbridge::cli::api_error))]
    ApiError { status: u16, message: String },

    #[error("Invalid --params: {message}")]
    #[diagnostic(
        code(taskbridge::cli::invalid_params),
        help("Pass a JSON object, e.g. --params '{{\"projectId\":\"...\"}}'")
    )]
    InvalidParams { message: String },
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CliError::ConnectionFailed { source: e }
        } else {
            CliError::InvalidResponse {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
