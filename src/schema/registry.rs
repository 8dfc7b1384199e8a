//! Schemas for every operation the gateway forwards.
//!
//! Each schema is built once on first use and shared for the lifetime of
//! the process.

use std::sync::LazyLock;

use serde_json::json;

use super::field::Field;
use super::validate::Schema;

pub const TASK_STATUSES: &[&str] = &[
    "BACKLOG",
    "TODO",
    "IN_PROGRESS",
    "IN_REVIEW",
    "DONE",
    "CANCELLED",
];
pub const PRIORITIES: &[&str] = &["LOW", "MEDIUM", "HIGH", "CRITICAL"];
pub const TASK_TYPES: &[&str] = &["TASK", "BUG", "FEATURE", "EPIC"];
/// Task types accepted on creation. Epics go through `createEpic` only.
pub const NEW_TASK_TYPES: &[&str] = &["TASK", "BUG", "FEATURE"];
pub const EPIC_HEALTH: &[&str] = &["ON_TRACK", "AT_RISK", "BLOCKED"];
pub const ENTITY_TYPES: &[&str] = &["task", "project"];
pub const WIKI_SPACE_TYPES: &[&str] = &[
    "PROJECT_DOCS",
    "TECHNICAL",
    "USER_MANUAL",
    "API_DOCS",
    "KNOWLEDGE_BASE",
];
pub const WIKI_PAGE_STATUSES: &[&str] = &["DRAFT", "PUBLISHED", "ARCHIVED"];
pub const WIKI_VISIBILITY: &[&str] = &["PUBLIC", "PRIVATE", "TEAM"];

macro_rules! schema {
    ($(#[$meta:meta])* $name:ident => $build:expr) => {
        $(#[$meta])*
        pub fn $name() -> &'static Schema {
            static SCHEMA: LazyLock<Schema> = LazyLock::new(|| $build);
            &SCHEMA
        }
    };
}

fn title(description: &'static str) -> Field {
    Field::string("title", description)
        .min_len(1, "Title is required")
        .max_len(255, "Title too long")
}

// =============================================================================
// Identifiers carried in the request path or query
// =============================================================================

/// Identifier that travels in the request path, advertised in catalogs.
pub fn id_field(name: &'static str, description: &'static str) -> Field {
    Field::string(name, description).required()
}

schema!(
    /// Operations that take no parameters.
    empty => Schema::new()
);

// =============================================================================
// Tasks
// =============================================================================

schema!(
    /// Body of `POST /tasks`.
    create_task => Schema::new()
        .field(
            Field::uuid("projectId", "Project ID")
                .required()
                .invalid_message("Invalid project ID format"),
        )
        .field(title("Task title").required())
        .field(Field::string("description", "Task description"))
        .field(Field::enumeration("type", NEW_TASK_TYPES, "Task type (not EPIC)").required())
        .field(
            Field::enumeration("priority", PRIORITIES, "Task priority")
                .default_value(json!("MEDIUM")),
        )
        .field(Field::integer("assignedTo", "User ID to assign to"))
        .field(Field::datetime("dueDate", "Due date (ISO string)"))
        .field(Field::uuid("parentId", "Parent task/epic ID"))
        .field(Field::number("estimatedHours", "Estimated hours"))
        .field(Field::number("storyPoints", "Story points"))
        .field(Field::uuid_array("dependsOn", "IDs of tasks this task depends on"))
        .field(Field::uuid_array("blockedBy", "IDs of tasks blocking this task"))
);

schema!(
    /// Body of `PATCH /tasks/{id}`. Every field is optional.
    update_task => Schema::new()
        .field(title("Task title"))
        .field(Field::string("description", "Task description"))
        .field(Field::enumeration("type", TASK_TYPES, "Task type"))
        .field(Field::enumeration("status", TASK_STATUSES, "Task status"))
        .field(Field::enumeration("priority", PRIORITIES, "Task priority"))
        .field(Field::uuid("parentId", "Parent task/epic ID"))
        .field(Field::integer("assignedTo", "User ID to assign to"))
        .field(Field::number("estimatedHours", "Estimated hours"))
        .field(Field::number("storyPoints", "Story points"))
        .field(Field::datetime("dueDate", "Due date (ISO string)"))
        .field(Field::uuid_array("dependsOn", "IDs of tasks this task depends on"))
        .field(Field::uuid_array("blockedBy", "IDs of tasks blocking this task"))
);

schema!(
    /// Body of `PATCH /task/{id}/status`.
    update_task_status => Schema::new()
        .field(Field::enumeration("status", TASK_STATUSES, "New status").required())
);

schema!(
    /// Query of `GET /tasks`.
    task_filters => Schema::new()
        .field(Field::uuid("projectId", "Filter by project ID"))
        .field(Field::enumeration("status", TASK_STATUSES, "Filter by status"))
        .field(Field::enumeration("type", TASK_TYPES, "Filter by type"))
        .field(Field::integer("assignedTo", "Filter by assignee user ID"))
);

// =============================================================================
// Epics
// =============================================================================

schema!(
    /// Body of `POST /epics`.
    create_epic => Schema::new()
        .field(
            Field::uuid("projectId", "Project ID")
                .required()
                .invalid_message("Invalid project ID format"),
        )
        .field(title("Epic title").required())
        .field(Field::string("description", "Epic description"))
        .field(
            Field::enumeration("priority", PRIORITIES, "Epic priority")
                .default_value(json!("MEDIUM")),
        )
        .field(Field::datetime("epicStartDate", "Epic start date (ISO string)"))
        .field(Field::datetime("epicEndDate", "Epic end date (ISO string)"))
        .field(Field::enumeration("epicHealth", EPIC_HEALTH, "Epic health status"))
        .field(Field::uuid_array("linkedTaskIds", "IDs of existing tasks to link to this epic"))
);

schema!(
    /// Body of `PATCH /epics/{id}`. Every field is optional.
    update_epic => Schema::new()
        .field(title("Epic title"))
        .field(Field::string("description", "Epic description"))
        .field(Field::enumeration("priority", PRIORITIES, "Epic priority"))
        .field(Field::enumeration("epicStatus", TASK_STATUSES, "Epic status"))
        .field(Field::enumeration("epicHealth", EPIC_HEALTH, "Epic health status"))
        .field(Field::datetime("epicStartDate", "Epic start date (ISO string)"))
        .field(Field::datetime("epicEndDate", "Epic end date (ISO string)"))
        .field(Field::number("epicProgress", "Epic progress percentage (0-100)"))
        .field(Field::number("estimatedHours", "Estimated hours"))
        .field(Field::number("storyPoints", "Story points"))
        .field(Field::integer("assignedTo", "User ID to assign to"))
        .field(Field::uuid_array("linkedTaskIds", "IDs of tasks to link to this epic"))
);

schema!(
    /// Query of `GET /epics`.
    epic_filters => Schema::new()
        .field(Field::uuid("projectId", "Filter by project ID"))
        .field(Field::string("status", "Filter by status"))
);

// =============================================================================
// Comments & attachments
// =============================================================================

schema!(
    /// Body of `POST /comments`.
    create_comment => Schema::new()
        .field(
            Field::uuid("taskId", "Task ID")
                .required()
                .invalid_message("Invalid task ID format"),
        )
        .field(
            Field::string("content", "Comment content")
                .required()
                .min_len(1, "Comment content is required")
                .max_len(5000, "Comment too long"),
        )
);

schema!(
    /// Query of `GET /attachments`.
    attachment_query => Schema::new()
        .field(Field::enumeration("entityType", ENTITY_TYPES, "Entity type").required())
        .field(
            Field::uuid("entityId", "Entity ID")
                .required()
                .invalid_message("Invalid entity ID format"),
        )
);

schema!(
    /// Body of `POST /attachments`.
    upload_attachment => Schema::new()
        .field(Field::enumeration("entityType", ENTITY_TYPES, "Entity type").required())
        .field(
            Field::uuid("entityId", "Entity ID")
                .required()
                .invalid_message("Invalid entity ID format"),
        )
        .field(
            Field::string("fileName", "File name")
                .required()
                .min_len(1, "File name is required")
                .max_len(255, "File name too long"),
        )
        .field(
            Field::string("base64Content", "Base64 encoded content")
                .required()
                .min_len(1, "File content is required"),
        )
        .field(
            Field::string("description", "Optional description")
                .max_len(1000, "Description too long"),
        )
);

// =============================================================================
// Wiki
// =============================================================================

schema!(
    /// Body of `POST /wiki/spaces`.
    create_wiki_space => Schema::new()
        .field(
            Field::uuid("projectId", "Project ID")
                .required()
                .invalid_message("Invalid project ID format"),
        )
        .field(Field::enumeration("type", WIKI_SPACE_TYPES, "Wiki space type"))
        .field(
            Field::string("name", "Wiki space name")
                .required()
                .min_len(1, "Name is required")
                .max_len(255, "Name too long"),
        )
        .field(
            Field::string("slug", "URL slug")
                .required()
                .min_len(1, "Slug is required")
                .max_len(255, "Slug too long"),
        )
        .field(Field::string("description", "Description"))
        .field(Field::string("icon", "Icon (emoji or URL)"))
        .field(Field::boolean("isPublic", "Is public").default_value(json!(false)))
);

schema!(
    /// Body of `POST /wiki/pages`.
    create_wiki_page => Schema::new()
        .field(
            Field::uuid("spaceId", "Wiki space ID")
                .required()
                .invalid_message("Invalid space ID format"),
        )
        .field(Field::uuid("categoryId", "Category ID"))
        .field(Field::uuid("parentId", "Parent page ID"))
        .field(
            Field::string("slug", "URL slug")
                .required()
                .min_len(1, "Slug is required")
                .max_len(255, "Slug too long"),
        )
        .field(title("Page title").required())
        .field(
            Field::string("content", "Markdown content")
                .required()
                .min_len(1, "Content is required"),
        )
        .field(Field::string("summary", "Brief summary"))
        .field(Field::enumeration("status", WIKI_PAGE_STATUSES, "Page status"))
        .field(Field::enumeration("visibility", WIKI_VISIBILITY, "Visibility"))
        .field(Field::string_array("keywords", "Keywords for search"))
);

schema!(
    /// Body of `PUT /wiki/pages/{id}`. Every field is optional.
    update_wiki_page => Schema::new()
        .field(title("Page title"))
        .field(Field::string("content", "Markdown content"))
        .field(Field::string("summary", "Brief summary"))
        .field(Field::enumeration("status", WIKI_PAGE_STATUSES, "Page status"))
        .field(Field::enumeration("visibility", WIKI_VISIBILITY, "Visibility"))
        .field(Field::string("versionSummary", "Version change summary"))
        .field(Field::string_array("keywords", "Keywords for search"))
);

schema!(
    /// Body of `POST /wiki/media`.
    upload_wiki_media => Schema::new()
        .field(
            Field::uuid("pageId", "Wiki page ID")
                .required()
                .invalid_message("Invalid page ID format"),
        )
        .field(
            Field::string("fileName", "File name")
                .required()
                .min_len(1, "File name is required")
                .max_len(255, "File name too long"),
        )
        .field(
            Field::string("base64Content", "Base64 encoded content with data URL")
                .required()
                .min_len(1, "File content is required"),
        )
        .field(Field::string("description", "Media description"))
        .field(Field::string("altText", "Alt text for images"))
);

schema!(
    /// Query of `GET /wiki/pages`.
    wiki_page_filters => Schema::new()
        .field(
            Field::uuid("spaceId", "Wiki space ID")
                .required()
                .invalid_message("Invalid space ID format"),
        )
        .field(Field::uuid("categoryId", "Filter by category ID"))
);

schema!(
    /// Query of `GET /wiki/search`.
    wiki_search => Schema::new()
        .field(
            Field::string("q", "Search query")
                .required()
                .min_len(1, "Search query is required"),
        )
        .field(Field::uuid("spaceId", "Limit to specific space"))
);
