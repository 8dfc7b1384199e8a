//! System health handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};
use utoipa::ToSchema;

use crate::api::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Gateway status; always healthy when it answers
    #[schema(example = "healthy")]
    pub gateway: String,
    /// Upstream health payload, or `"unhealthy"`
    #[schema(value_type = Object)]
    pub upstream: Value,
    /// Why the upstream is unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check endpoint
///
/// Reports the gateway as healthy and relays the upstream health check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Gateway and upstream are healthy", body = HealthResponse),
        (status = 503, description = "Upstream is unhealthy", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.dispatcher().health().await {
        Ok(upstream) => (
            StatusCode::OK,
            Json(HealthResponse {
                gateway: "healthy".to_string(),
                upstream,
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "upstream health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    gateway: "healthy".to_string(),
                    upstream: Value::String("unhealthy".to_string()),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
