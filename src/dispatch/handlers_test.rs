use serde_json::json;

use crate::dispatch::take_id;

#[test]
fn test_take_id_removes_key() {
    let mut params = json!({ "id": "t-1", "status": "DONE" })
        .as_object()
        .unwrap()
        .clone();

    assert_eq!(take_id(&mut params, "id"), "t-1");
    assert!(!params.contains_key("id"));
    assert_eq!(params["status"], "DONE");
}

#[test]
fn test_take_id_missing_or_unusable() {
    let mut params = json!({ "id": null, "taskId": ["x"] })
        .as_object()
        .unwrap()
        .clone();

    assert_eq!(take_id(&mut params, "id"), "");
    assert_eq!(take_id(&mut params, "taskId"), "");
    assert_eq!(take_id(&mut params, "attachmentId"), "");
}

#[test]
fn test_take_id_accepts_numbers() {
    let mut params = json!({ "id": 42 }).as_object().unwrap().clone();
    assert_eq!(take_id(&mut params, "id"), "42");
}
