//! API route configuration.

use axum::Router;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{self, FunctionsResponse, HealthResponse};
use super::state::AppState;
use crate::dispatch::{Envelope, OperationInfo};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Taskbridge API",
        version = "0.3.0",
        description = "Function-call gateway to the project-management API",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        handlers::list_functions,
        handlers::call_function,
    ),
    components(
        schemas(
            HealthResponse,
            FunctionsResponse,
            OperationInfo,
            Envelope,
        )
    ),
    tags(
        (name = "system", description = "Gateway and upstream health"),
        (name = "functions", description = "Function catalog and invocation")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router(state: AppState) -> Router {
    let api = ApiDoc::openapi();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/functions", get(handlers::list_functions))
        .route("/functions/{name}", post(handlers::call_function))
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
