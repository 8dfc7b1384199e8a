//! In-process stand-in for the upstream API, used by tests across the crate.
//!
//! Serves under `/api/claude` on an ephemeral port, records every request,
//! and keeps just enough task/comment state for end-to-end flows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use super::{UpstreamClient, UpstreamConfig};

pub const API_KEY: &str = "test-key";
pub const PROJECT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
const PREFIX: &str = "/api/claude";

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Path below the `/api/claude` prefix, e.g. `/tasks`
    pub path: String,
    pub raw_query: Option<String>,
    pub query: HashMap<String, String>,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockData {
    requests: Vec<Recorded>,
    tasks: HashMap<String, Value>,
    next_id: u64,
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<MockData>>);

pub struct MockUpstream {
    pub base_url: String,
    state: MockState,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockUpstream {
    pub async fn spawn() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}{PREFIX}"),
            state,
            _handle: handle,
        }
    }

    pub fn config(&self) -> UpstreamConfig {
        UpstreamConfig::new(self.base_url.clone(), API_KEY)
    }

    pub fn client(&self) -> UpstreamClient {
        init_crypto();
        UpstreamClient::new(self.config()).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.0.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests()
            .pop()
            .expect("mock upstream received no request")
    }
}

pub fn init_crypto() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Base URL on a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{PREFIX}")
}

/// Base URL of a listener that accepts connections and never answers.
pub async fn silent_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}{PREFIX}")
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(PREFIX)
        .unwrap_or(uri.path())
        .to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut data = state.0.lock().unwrap();
    data.requests.push(Recorded {
        method: method.clone(),
        path: path.clone(),
        raw_query: uri.query().map(str::to_string),
        query: query.clone(),
        api_key: api_key.clone(),
        body: body.clone(),
    });

    if api_key.as_deref() != Some(API_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API key" })),
        )
            .into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => Json(json!({ "status": "ok" })).into_response(),
        ("GET", ["projects"]) => {
            Json(json!([{ "id": PROJECT_ID, "name": "Demo" }])).into_response()
        }
        ("GET", ["projects", "explode"]) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database down" })),
        )
            .into_response(),
        ("GET", ["projects", "teapot"]) => (StatusCode::IM_A_TEAPOT, "short and stout").into_response(),
        ("POST", ["tasks"]) => {
            data.next_id += 1;
            let id = format!("00000000-0000-4000-8000-{:012}", data.next_id);
            let mut task = body;
            task["id"] = json!(id);
            task["status"] = json!("TODO");
            task["comments"] = json!([]);
            data.tasks.insert(id, task.clone());
            (StatusCode::CREATED, Json(task)).into_response()
        }
        ("GET", ["task", id]) => match data.tasks.get(*id) {
            Some(task) => {
                let mut task = task.clone();
                let count = task["comments"].as_array().map_or(0, Vec::len);
                task["_count"] = json!({ "comments": count });
                Json(task).into_response()
            }
            None => not_found("Task not found"),
        },
        ("PATCH", ["task", id, "status"]) => match data.tasks.get_mut(*id) {
            Some(task) => {
                task["status"] = body["status"].clone();
                Json(task.clone()).into_response()
            }
            None => not_found("Task not found"),
        },
        ("POST", ["comments"]) => {
            let task_id = body["taskId"].as_str().unwrap_or_default().to_string();
            match data.tasks.get_mut(&task_id) {
                Some(task) => {
                    let comment = json!({ "id": "c-1", "taskId": task_id, "content": body["content"] });
                    if let Some(comments) = task["comments"].as_array_mut() {
                        comments.push(comment.clone());
                    }
                    (StatusCode::CREATED, Json(comment)).into_response()
                }
                None => not_found("Task not found"),
            }
        }
        // Mirrors upstream versions that return nothing when the epic
        // body carries a redundant type.
        ("POST", ["epics"]) if body.get("type").is_some() => StatusCode::OK.into_response(),
        ("DELETE", ["wiki", "pages", _]) => StatusCode::NO_CONTENT.into_response(),
        _ => Json(json!({
            "method": method.as_str(),
            "path": path,
            "query": query,
            "body": body,
        }))
        .into_response(),
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}
