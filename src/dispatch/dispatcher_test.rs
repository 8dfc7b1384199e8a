//! Dispatcher tests against the in-process mock upstream

use serde_json::{Value, json};

use crate::dispatch::{Dispatcher, OperationRegistry};
use crate::upstream::GatewayError;
use crate::upstream::mock::{MockUpstream, PROJECT_ID};

const OPERATIONS: &[&str] = &[
    "getProjects",
    "getProject",
    "getTasks",
    "getTask",
    "createTask",
    "updateTaskStatus",
    "updateTask",
    "getEpics",
    "createEpic",
    "updateEpic",
    "getComments",
    "addComment",
    "getAttachments",
    "uploadAttachment",
    "downloadAttachment",
    "getWikiSpaces",
    "createWikiSpace",
    "getWikiPages",
    "getWikiPage",
    "createWikiPage",
    "updateWikiPage",
    "deleteWikiPage",
    "uploadWikiMedia",
    "getWikiMedia",
    "searchWiki",
];

async fn dispatcher() -> (MockUpstream, Dispatcher) {
    let upstream = MockUpstream::spawn().await;
    let dispatcher = Dispatcher::new(upstream.client());
    (upstream, dispatcher)
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_standard_registry_order_and_names() {
    let registry = OperationRegistry::standard();
    let names: Vec<&str> = registry.iter().map(|op| op.name).collect();
    assert_eq!(names, OPERATIONS);
}

#[test]
fn test_catalog_advertises_path_ids() {
    let catalog = OperationRegistry::standard().catalog();
    let update_task = catalog.iter().find(|op| op.name == "updateTask").unwrap();

    assert_eq!(update_task.parameters["type"], "object");
    assert_eq!(update_task.parameters["required"], json!(["id"]));
    assert!(update_task.parameters["properties"]["dependsOn"].is_object());

    let download = catalog
        .iter()
        .find(|op| op.name == "downloadAttachment")
        .unwrap();
    assert_eq!(download.parameters["required"], json!(["attachmentId"]));
}

#[test]
fn test_catalog_entries_have_descriptions() {
    for info in OperationRegistry::standard().catalog() {
        assert!(!info.description.is_empty(), "{} lacks a description", info.name);
        assert_eq!(info.parameters["type"], "object");
    }
}

#[test]
fn test_register_replaces_existing_name() {
    let registry = OperationRegistry::standard();
    let count = registry.len();
    let first = registry.get("getProjects").unwrap().handler;

    let registry = registry.register(
        "getProjects",
        "Replaced",
        crate::schema::Schema::new(),
        first,
    );

    assert_eq!(registry.len(), count);
    assert_eq!(registry.get("getProjects").unwrap().description, "Replaced");
    assert_eq!(registry.iter().next().unwrap().name, "getProjects");
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_operation_makes_no_upstream_call() {
    let (upstream, dispatcher) = dispatcher().await;

    let err = dispatcher
        .dispatch("dropDatabase", json!({}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::UnknownOperation {
            name: "dropDatabase".to_string()
        }
    );
    assert_eq!(err.to_string(), "Function 'dropDatabase' not found");
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_null_params_count_as_empty() {
    let (upstream, dispatcher) = dispatcher().await;

    let projects = dispatcher.dispatch("getProjects", Value::Null).await.unwrap();

    assert_eq!(projects[0]["id"], PROJECT_ID);
    assert_eq!(upstream.last_request().path, "/projects");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_object_params_rejected() {
    let (upstream, dispatcher) = dispatcher().await;

    let err = dispatcher
        .dispatch("getTasks", json!(["projectId"]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Parameters must be a JSON object");
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_ids_fail_before_upstream() {
    let (upstream, dispatcher) = dispatcher().await;

    for (name, entity) in [
        ("updateTaskStatus", "Task"),
        ("updateTask", "Task"),
        ("updateEpic", "Epic"),
    ] {
        for params in [json!({ "status": "DONE" }), json!({ "id": "", "status": "DONE" })] {
            let err = dispatcher.dispatch(name, params).await.unwrap_err();
            assert_eq!(err.to_string(), format!("{entity} ID is required"));
        }
    }

    let err = dispatcher
        .dispatch("downloadAttachment", json!({ "id": "wrong-key" }))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Attachment ID is required");

    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_task_status_splits_id_from_body() {
    let (upstream, dispatcher) = dispatcher().await;
    let task = dispatcher
        .dispatch(
            "createTask",
            json!({ "projectId": PROJECT_ID, "title": "Split ids", "type": "TASK" }),
        )
        .await
        .unwrap();
    let id = task["id"].as_str().unwrap();

    dispatcher
        .dispatch("updateTaskStatus", json!({ "id": id, "status": "DONE" }))
        .await
        .unwrap();

    let request = upstream.last_request();
    assert_eq!(request.path, format!("/task/{id}/status"));
    assert_eq!(request.body, json!({ "status": "DONE" }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_task_rejects_epic_type() {
    let (upstream, dispatcher) = dispatcher().await;

    let err = dispatcher
        .dispatch(
            "createTask",
            json!({ "projectId": PROJECT_ID, "title": "Big thing", "type": "EPIC" }),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidRequest { .. }));
    assert!(err.to_string().contains("type: Invalid enum value"));
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stringified_non_array_is_rejected() {
    let (upstream, dispatcher) = dispatcher().await;

    let err = dispatcher
        .dispatch(
            "createEpic",
            json!({
                "projectId": PROJECT_ID,
                "title": "Linked",
                "linkedTaskIds": "{\"id\":\"x\"}",
            }),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Validation failed: linkedTaskIds: Expected array, received string"
    );
    assert!(upstream.requests().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_comments_uses_task_id_query() {
    let (upstream, dispatcher) = dispatcher().await;

    dispatcher
        .dispatch("getComments", json!({ "taskId": "t-7" }))
        .await
        .unwrap();

    let request = upstream.last_request();
    assert_eq!(request.path, "/comments");
    assert_eq!(request.query["taskId"], "t-7");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_task_lifecycle_through_dispatch() {
    let (_upstream, dispatcher) = dispatcher().await;

    let task = dispatcher
        .dispatch(
            "createTask",
            json!({ "projectId": PROJECT_ID, "title": "Lifecycle", "type": "BUG" }),
        )
        .await
        .unwrap();
    let id = task["id"].as_str().unwrap().to_string();

    dispatcher
        .dispatch("addComment", json!({ "taskId": id, "content": "Repro found" }))
        .await
        .unwrap();
    dispatcher
        .dispatch("updateTaskStatus", json!({ "id": id, "status": "IN_PROGRESS" }))
        .await
        .unwrap();

    let fetched = dispatcher
        .dispatch("getTask", json!({ "id": id }))
        .await
        .unwrap();
    assert_eq!(fetched["status"], "IN_PROGRESS");
    assert_eq!(fetched["_count"]["comments"], 1);
}
