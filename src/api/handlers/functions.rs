//! Function catalog and invocation handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::dispatch::{Envelope, OperationInfo};
use crate::upstream::GatewayError;

// =============================================================================
// DTOs
// =============================================================================

/// Catalog of callable functions
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FunctionsResponse {
    pub functions: Vec<OperationInfo>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List functions
///
/// Returns every callable function with its parameter schema
#[utoipa::path(
    get,
    path = "/functions",
    tag = "functions",
    responses(
        (status = 200, description = "Function catalog", body = FunctionsResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_functions(State(state): State<AppState>) -> Json<FunctionsResponse> {
    Json(FunctionsResponse {
        functions: state.dispatcher().catalog(),
    })
}

/// Call a function
///
/// Validates the JSON body against the function's schema and forwards it
/// upstream. An empty body counts as `{}`.
#[utoipa::path(
    post,
    path = "/functions/{name}",
    tag = "functions",
    params(
        ("name" = String, Path, description = "Function name, e.g. getTasks")
    ),
    request_body(content = Object, description = "Function parameters", content_type = "application/json"),
    responses(
        (status = 200, description = "Function succeeded", body = Envelope),
        (status = 400, description = "Body is not valid JSON", body = Envelope),
        (status = 404, description = "Function not found", body = Envelope),
        (status = 500, description = "Validation or upstream failure", body = Envelope)
    )
)]
#[instrument(skip(state, body))]
pub async fn call_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Envelope>) {
    if state.dispatcher().registry().get(&name).is_none() {
        let error = GatewayError::UnknownOperation { name };
        return (StatusCode::NOT_FOUND, Json(Envelope::failure(&error)));
    }

    let params = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        match serde_json::from_slice(&body) {
            Ok(params) => params,
            Err(e) => {
                let error = GatewayError::InvalidRequest {
                    message: format!("Malformed JSON body: {e}"),
                };
                return (StatusCode::BAD_REQUEST, Json(Envelope::failure(&error)));
            }
        }
    };

    match state.dispatcher().dispatch(&name, params).await {
        Ok(data) => (StatusCode::OK, Json(Envelope::ok(data))),
        Err(e) => {
            let status = match e {
                GatewayError::UnknownOperation { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(Envelope::failure(&e)))
        }
    }
}
