use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::env;

use crate::cli::error::{CliError, CliResult};
use crate::dispatch::Envelope;

/// API client for the gateway's HTTP surface
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Priority for base URL:
    /// 1. Explicit `api_url` parameter
    /// 2. TASKBRIDGE_GATEWAY_URL environment variable
    /// 3. Default: http://localhost:3010
    pub fn new(api_url: Option<String>) -> Self {
        let base_url = api_url
            .or_else(|| env::var("TASKBRIDGE_GATEWAY_URL").ok())
            .unwrap_or_else(|| "http://localhost:3010".to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the base URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a GET request builder
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.get(&url)
    }

    /// Create a POST request builder
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.post(&url)
    }

    /// Handle API response with standardized error handling
    ///
    /// Returns the deserialized response body on success,
    /// or a CliError::ApiError on non-success status codes.
    pub async fn handle_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| CliError::InvalidResponse {
                    message: e.to_string(),
                })
        } else {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(CliError::ApiError {
                status,
                message: error_text,
            })
        }
    }

    /// Unwrap a function-call envelope, whatever the status code.
    ///
    /// A failed call surfaces the envelope's error message rather than the
    /// raw body.
    pub async fn handle_envelope(response: Response) -> CliResult<serde_json::Value> {
        let status = response.status().as_u16();
        let envelope: Envelope = response.json().await?;

        if envelope.success {
            Ok(envelope.data.unwrap_or_default())
        } else {
            Err(CliError::ApiError {
                status,
                message: envelope
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}
