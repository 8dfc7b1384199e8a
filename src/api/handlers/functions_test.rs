//! Integration tests for the function endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::dispatch::Dispatcher;
use crate::upstream::mock::{MockUpstream, PROJECT_ID};

async fn test_app() -> (MockUpstream, axum::Router) {
    let upstream = MockUpstream::spawn().await;
    let app = routes::create_router(AppState::new(Dispatcher::new(upstream.client())));
    (upstream, app)
}

/// Helper to parse JSON response body
async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn call(name: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/functions/{name}"))
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

// =============================================================================
// GET /functions
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_functions_returns_catalog() {
    let (_upstream, app) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/functions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let functions = body["functions"].as_array().expect("Expected array");
    assert_eq!(functions.len(), 25);

    let create_task = functions
        .iter()
        .find(|f| f["name"] == "createTask")
        .expect("createTask listed");
    assert_eq!(create_task["parameters"]["type"], "object");
    assert_eq!(
        create_task["parameters"]["properties"]["type"]["enum"],
        json!(["TASK", "BUG", "FEATURE"])
    );
}

// =============================================================================
// POST /functions/{name}
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn call_function_wraps_result_in_envelope() {
    let (_upstream, app) = test_app().await;

    let response = app.oneshot(call("getProjects", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["id"], PROJECT_ID);
    assert!(body.get("error").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn call_function_accepts_empty_body() {
    let (upstream, app) = test_app().await;

    let response = app.oneshot(call("getTasks", Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.last_request().raw_query, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn call_unknown_function_returns_404() {
    let (upstream, app) = test_app().await;

    let response = app.oneshot(call("sadmin_getProjects", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "error": "Function 'sadmin_getProjects' not found" })
    );
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn call_function_validation_failure_returns_500() {
    let (upstream, app) = test_app().await;

    let response = app
        .oneshot(call(
            "createTask",
            json!({ "projectId": PROJECT_ID, "title": "Nope", "type": "EPIC" }).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Validation failed: type: ")
    );
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn call_function_relays_upstream_error() {
    let (_upstream, app) = test_app().await;

    let response = app
        .oneshot(call("getTask", json!({ "id": "missing" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "API Error (404): Task not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn call_function_rejects_malformed_json() {
    let (upstream, app) = test_app().await;

    let response = app.oneshot(call("getTasks", "{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Malformed JSON body")
    );
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_function_wins_over_malformed_json() {
    let (upstream, app) = test_app().await;

    let response = app.oneshot(call("noSuchFunction", "{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await,
        json!({ "success": false, "error": "Function 'noSuchFunction' not found" })
    );
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_returns_null_data() {
    let (_upstream, app) = test_app().await;

    let response = app
        .oneshot(call("deleteWikiPage", json!({ "id": "page-1" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "success": true, "data": null })
    );
}

// =============================================================================
// GET /docs
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn docs_are_served() {
    let (_upstream, app) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
