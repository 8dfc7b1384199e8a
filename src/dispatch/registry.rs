use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::schema::registry::{self as schemas, id_field};
use crate::schema::{Field, Schema};

use super::handlers::{self, Handler};

/// A named upstream operation exposed by both shells.
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
    /// Advertised input: path identifiers plus the body or query schema
    pub schema: Schema,
    pub handler: Handler,
}

impl Operation {
    pub fn info(&self) -> OperationInfo {
        OperationInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: self.schema.json_schema(),
        }
    }
}

/// Catalog entry for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OperationInfo {
    #[schema(example = "getTasks")]
    pub name: String,
    pub description: String,
    /// JSON Schema of the accepted parameters
    #[schema(value_type = Object)]
    pub parameters: Value,
}

/// Name-keyed set of operations, kept in registration order.
#[derive(Default)]
pub struct OperationRegistry {
    operations: Vec<Operation>,
    index: HashMap<&'static str, usize>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation. A later registration under the same name
    /// replaces the earlier one in place.
    pub fn register(
        mut self,
        name: &'static str,
        description: &'static str,
        schema: Schema,
        handler: Handler,
    ) -> Self {
        let operation = Operation {
            name,
            description,
            schema,
            handler,
        };
        match self.index.get(name) {
            Some(&position) => self.operations[position] = operation,
            None => {
                self.index.insert(name, self.operations.len());
                self.operations.push(operation);
            }
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.index.get(name).map(|&position| &self.operations[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn catalog(&self) -> Vec<OperationInfo> {
        self.iter().map(Operation::info).collect()
    }

    /// Every operation of the upstream API.
    pub fn standard() -> Self {
        Self::new()
            // Projects
            .register(
                "getProjects",
                "Get list of all active projects",
                schemas::empty().clone(),
                handlers::get_projects,
            )
            .register(
                "getProject",
                "Get project details by ID",
                with_id("id", "Project ID", schemas::empty()),
                handlers::get_project,
            )
            // Tasks
            .register(
                "getTasks",
                "Get list of tasks with optional filters",
                schemas::task_filters().clone(),
                handlers::get_tasks,
            )
            .register(
                "getTask",
                "Get task details by ID",
                with_id("id", "Task ID", schemas::empty()),
                handlers::get_task,
            )
            .register(
                "createTask",
                "Create a new task (use createEpic for epics)",
                schemas::create_task().clone(),
                handlers::create_task,
            )
            .register(
                "updateTaskStatus",
                "Update task status",
                with_id("id", "Task ID", schemas::update_task_status()),
                handlers::update_task_status,
            )
            .register(
                "updateTask",
                "Update task details",
                with_id("id", "Task ID", schemas::update_task()),
                handlers::update_task,
            )
            // Epics
            .register(
                "getEpics",
                "Get list of epics with optional filters",
                schemas::epic_filters().clone(),
                handlers::get_epics,
            )
            .register(
                "createEpic",
                "Create a new epic",
                schemas::create_epic().clone(),
                handlers::create_epic,
            )
            .register(
                "updateEpic",
                "Update epic details",
                with_id("id", "Epic ID", schemas::update_epic()),
                handlers::update_epic,
            )
            // Comments & attachments
            .register(
                "getComments",
                "Get comments for a task",
                with_id("taskId", "Task ID", schemas::empty()),
                handlers::get_comments,
            )
            .register(
                "addComment",
                "Add comment to a task",
                schemas::create_comment().clone(),
                handlers::add_comment,
            )
            .register(
                "getAttachments",
                "Get attachments for an entity",
                schemas::attachment_query().clone(),
                handlers::get_attachments,
            )
            .register(
                "uploadAttachment",
                "Upload file attachment",
                schemas::upload_attachment().clone(),
                handlers::upload_attachment,
            )
            .register(
                "downloadAttachment",
                "Download attachment by ID",
                with_id("attachmentId", "Attachment ID", schemas::empty()),
                handlers::download_attachment,
            )
            // Wiki
            .register(
                "getWikiSpaces",
                "Get Wiki spaces by project",
                Schema::new().field(Field::string(
                    "projectId",
                    "Project ID (defaults to the configured project)",
                )),
                handlers::get_wiki_spaces,
            )
            .register(
                "createWikiSpace",
                "Create new Wiki space",
                schemas::create_wiki_space().clone(),
                handlers::create_wiki_space,
            )
            .register(
                "getWikiPages",
                "Get Wiki pages by space",
                schemas::wiki_page_filters().clone(),
                handlers::get_wiki_pages,
            )
            .register(
                "getWikiPage",
                "Get Wiki page by ID",
                with_id("id", "Wiki page ID", schemas::empty()),
                handlers::get_wiki_page,
            )
            .register(
                "createWikiPage",
                "Create new Wiki page",
                schemas::create_wiki_page().clone(),
                handlers::create_wiki_page,
            )
            .register(
                "updateWikiPage",
                "Update Wiki page",
                with_id("id", "Wiki page ID", schemas::update_wiki_page()),
                handlers::update_wiki_page,
            )
            .register(
                "deleteWikiPage",
                "Soft delete Wiki page",
                with_id("id", "Wiki page ID", schemas::empty()),
                handlers::delete_wiki_page,
            )
            .register(
                "uploadWikiMedia",
                "Upload media file to Wiki page",
                schemas::upload_wiki_media().clone(),
                handlers::upload_wiki_media,
            )
            .register(
                "getWikiMedia",
                "Get Wiki media file",
                with_id("id", "Media attachment ID", schemas::empty()),
                handlers::get_wiki_media,
            )
            .register(
                "searchWiki",
                "Search Wiki pages",
                schemas::wiki_search().clone(),
                handlers::search_wiki,
            )
    }
}

fn with_id(name: &'static str, description: &'static str, rest: &Schema) -> Schema {
    Schema::new().field(id_field(name, description)).merge(rest)
}
