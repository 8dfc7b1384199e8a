use miette::Diagnostic;
use thiserror::Error;

use crate::schema::ValidationError;

/// Every way a gateway call can fail.
///
/// Shells only ever see the rendered message; no upstream internals or
/// source chains are forwarded to callers.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{message}")]
    #[diagnostic(
        code(taskbridge::invalid_request),
        help("Check the operation's parameter schema with GET /functions.")
    )]
    InvalidRequest { message: String },

    #[error("Function '{name}' not found")]
    #[diagnostic(
        code(taskbridge::unknown_operation),
        help("List available functions with GET /functions.")
    )]
    UnknownOperation { name: String },

    #[error("API Error ({status}): {message}")]
    #[diagnostic(code(taskbridge::upstream_error))]
    Upstream { status: u16, message: String },

    #[error("No response from upstream API. Please check if the server is running.")]
    #[diagnostic(
        code(taskbridge::unreachable_upstream),
        help("Verify TASKBRIDGE_UPSTREAM_URL and that the upstream API is up.")
    )]
    Unreachable { reason: String },

    #[error("Request setup error: {message}")]
    #[diagnostic(code(taskbridge::request_construction))]
    RequestConstruction { message: String },
}

impl GatewayError {
    /// `InvalidRequest` for a missing path identifier.
    pub fn missing_id(entity: &str) -> Self {
        GatewayError::InvalidRequest {
            message: format!("{entity} ID is required"),
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(e: ValidationError) -> Self {
        GatewayError::InvalidRequest {
            message: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            GatewayError::RequestConstruction {
                message: e.to_string(),
            }
        } else if let Some(status) = e.status() {
            GatewayError::Upstream {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            }
        } else {
            // Connect failures, timeouts, and requests that died mid-flight
            GatewayError::Unreachable {
                reason: e.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::RequestConstruction {
            message: e.to_string(),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
