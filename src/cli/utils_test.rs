use serde_json::json;

use crate::cli::utils::*;

#[test]
fn test_truncate_with_ellipsis() {
    assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    assert_eq!(
        truncate_with_ellipsis("hello world this is a long string", 10),
        "hello w..."
    );
    assert_eq!(truncate_with_ellipsis("hello 世界", 7), "hell...");
}

#[test]
fn test_format_required() {
    assert_eq!(
        format_required(&json!({ "required": ["id", "status"] })),
        "id, status"
    );
    assert_eq!(format_required(&json!({ "type": "object" })), "-");
    assert_eq!(format_required(&json!({ "required": [] })), "-");
}
