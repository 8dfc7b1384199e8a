use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::coerce::coerce_array_fields;
use crate::schema::{RawInput, Schema, ValidatedRequest, registry};

use super::error::{GatewayError, GatewayResult};
use super::requests::{
    AttachmentQuery, CreateCommentRequest, CreateEpicRequest, CreateTaskRequest,
    CreateWikiPageRequest, CreateWikiSpaceRequest, EpicFilters, TaskFilters, TaskType,
    UpdateEpicRequest, UpdateTaskRequest, UpdateTaskStatusRequest, UpdateWikiPageRequest,
    UploadAttachmentRequest, UploadWikiMediaRequest, WikiPageFilters, WikiSearchQuery,
};

/// Header carrying the upstream API key on every call.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Settings for [`UpstreamClient`].
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL every path is appended to (e.g. `http://localhost:3006/api/claude`)
    pub base_url: String,
    /// Static API key sent as `X-API-Key`
    pub api_key: String,
    /// Bound on every upstream call, connect through body
    pub timeout: Duration,
    /// Project used when a project-scoped call omits `projectId`
    pub default_project_id: Option<String>,
    /// Send `type: "EPIC"` in epic creation bodies. Some upstream versions
    /// answer with an empty body when the redundant discriminator is present.
    pub send_epic_type: bool,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
            default_project_id: None,
            send_epic_type: false,
        }
    }
}

/// Typed client for the upstream project-management API.
///
/// One method per upstream operation. Every method that takes caller input
/// repairs string-encoded arrays, validates against the operation schema,
/// and only then issues exactly one HTTP call. Responses are returned
/// undecoded beyond JSON parsing.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base_url: Url,
    http: Client,
    default_project_id: Option<String>,
    send_epic_type: bool,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> GatewayResult<Self> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| GatewayError::RequestConstruction {
                message: format!("invalid upstream URL '{}': {e}", config.base_url),
            })?;

        let mut api_key = HeaderValue::from_str(&config.api_key).map_err(|e| {
            GatewayError::RequestConstruction {
                message: format!("invalid API key header value: {e}"),
            }
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url,
            http,
            default_project_id: config.default_project_id,
            send_epic_type: config.send_epic_type,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    // =========================================================================
    // Projects
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn get_projects(&self) -> GatewayResult<Value> {
        self.send(self.request(Method::GET, &["projects"])?).await
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, id: &str) -> GatewayResult<Value> {
        let id = require_id(id, "Project")?;
        self.send(self.request(Method::GET, &["projects", id])?)
            .await
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// List tasks. Only filters that were supplied become query parameters;
    /// the default project never narrows a listing.
    #[instrument(skip_all)]
    pub async fn get_tasks(&self, input: &RawInput) -> GatewayResult<Value> {
        let filters: TaskFilters = self
            .prepare(registry::task_filters(), input)?
            .into_typed()?;
        self.send(self.request(Method::GET, &["tasks"])?.query(&filters))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, id: &str) -> GatewayResult<Value> {
        let id = require_id(id, "Task")?;
        self.send(self.request(Method::GET, &["task", id])?).await
    }

    #[instrument(skip_all)]
    pub async fn create_task(&self, input: &RawInput) -> GatewayResult<Value> {
        let body: CreateTaskRequest = self
            .prepare_scoped(registry::create_task(), input)?
            .into_typed()?;
        self.send(self.request(Method::POST, &["tasks"])?.json(&body))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn update_task_status(&self, id: &str, input: &RawInput) -> GatewayResult<Value> {
        let id = require_id(id, "Task")?;
        let body: UpdateTaskStatusRequest = self
            .prepare(registry::update_task_status(), input)?
            .into_typed()?;
        self.send(
            self.request(Method::PATCH, &["task", id, "status"])?
                .json(&body),
        )
        .await
    }

    /// Partial update; the id is only ever part of the path.
    #[instrument(skip(self, input))]
    pub async fn update_task(&self, id: &str, input: &RawInput) -> GatewayResult<Value> {
        let id = require_id(id, "Task")?;
        let body: UpdateTaskRequest = self.prepare(registry::update_task(), input)?.into_typed()?;
        self.send(self.request(Method::PATCH, &["tasks", id])?.json(&body))
            .await
    }

    // =========================================================================
    // Epics
    // =========================================================================

    #[instrument(skip_all)]
    pub async fn get_epics(&self, input: &RawInput) -> GatewayResult<Value> {
        let filters: EpicFilters = self
            .prepare(registry::epic_filters(), input)?
            .into_typed()?;
        self.send(self.request(Method::GET, &["epics"])?.query(&filters))
            .await
    }

    /// Create an epic. The `type` discriminator is left out of the body
    /// unless `send_epic_type` is enabled.
    #[instrument(skip_all)]
    pub async fn create_epic(&self, input: &RawInput) -> GatewayResult<Value> {
        let mut body: CreateEpicRequest = self
            .prepare_scoped(registry::create_epic(), input)?
            .into_typed()?;
        if self.send_epic_type {
            body.discriminator = Some(TaskType::Epic);
        }
        self.send(self.request(Method::POST, &["epics"])?.json(&body))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn update_epic(&self, id: &str, input: &RawInput) -> GatewayResult<Value> {
        let id = require_id(id, "Epic")?;
        let body: UpdateEpicRequest = self.prepare(registry::update_epic(), input)?.into_typed()?;
        self.send(self.request(Method::PATCH, &["epics", id])?.json(&body))
            .await
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn get_comments(&self, task_id: &str) -> GatewayResult<Value> {
        let task_id = require_id(task_id, "Task")?;
        self.send(
            self.request(Method::GET, &["comments"])?
                .query(&[("taskId", task_id)]),
        )
        .await
    }

    #[instrument(skip_all)]
    pub async fn create_comment(&self, input: &RawInput) -> GatewayResult<Value> {
        let body: CreateCommentRequest = self
            .prepare(registry::create_comment(), input)?
            .into_typed()?;
        self.send(self.request(Method::POST, &["comments"])?.json(&body))
            .await
    }

    // =========================================================================
    // Attachments
    // =========================================================================

    #[instrument(skip_all)]
    pub async fn get_attachments(&self, input: &RawInput) -> GatewayResult<Value> {
        let query: AttachmentQuery = self
            .prepare(registry::attachment_query(), input)?
            .into_typed()?;
        self.send(self.request(Method::GET, &["attachments"])?.query(&query))
            .await
    }

    #[instrument(skip_all)]
    pub async fn upload_attachment(&self, input: &RawInput) -> GatewayResult<Value> {
        let body: UploadAttachmentRequest = self
            .prepare(registry::upload_attachment(), input)?
            .into_typed()?;
        self.send(self.request(Method::POST, &["attachments"])?.json(&body))
            .await
    }

    #[instrument(skip(self))]
    pub async fn download_attachment(&self, id: &str) -> GatewayResult<Value> {
        let id = require_id(id, "Attachment")?;
        self.send(self.request(Method::GET, &["attachments", id, "download"])?)
            .await
    }

    // =========================================================================
    // Wiki
    // =========================================================================

    /// List wiki spaces of a project, falling back to the default project
    /// when `project_id` is empty.
    #[instrument(skip(self))]
    pub async fn get_wiki_spaces(&self, project_id: &str) -> GatewayResult<Value> {
        let project_id = match (project_id.trim(), &self.default_project_id) {
            ("", Some(default)) => default.as_str(),
            (given, _) => require_id(given, "Project")?,
        };
        self.send(
            self.request(Method::GET, &["wiki", "spaces"])?
                .query(&[("projectId", project_id)]),
        )
        .await
    }

    #[instrument(skip_all)]
    pub async fn create_wiki_space(&self, input: &RawInput) -> GatewayResult<Value> {
        let body: CreateWikiSpaceRequest = self
            .prepare_scoped(registry::create_wiki_space(), input)?
            .into_typed()?;
        self.send(self.request(Method::POST, &["wiki", "spaces"])?.json(&body))
            .await
    }

    #[instrument(skip_all)]
    pub async fn get_wiki_pages(&self, input: &RawInput) -> GatewayResult<Value> {
        let filters: WikiPageFilters = self
            .prepare(registry::wiki_page_filters(), input)?
            .into_typed()?;
        self.send(
            self.request(Method::GET, &["wiki", "pages"])?
                .query(&filters),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_wiki_page(&self, id: &str) -> GatewayResult<Value> {
        let id = require_id(id, "Wiki page")?;
        self.send(self.request(Method::GET, &["wiki", "pages", id])?)
            .await
    }

    #[instrument(skip_all)]
    pub async fn create_wiki_page(&self, input: &RawInput) -> GatewayResult<Value> {
        let body: CreateWikiPageRequest = self
            .prepare(registry::create_wiki_page(), input)?
            .into_typed()?;
        self.send(self.request(Method::POST, &["wiki", "pages"])?.json(&body))
            .await
    }

    #[instrument(skip(self, input))]
    pub async fn update_wiki_page(&self, id: &str, input: &RawInput) -> GatewayResult<Value> {
        let id = require_id(id, "Wiki page")?;
        let body: UpdateWikiPageRequest = self
            .prepare(registry::update_wiki_page(), input)?
            .into_typed()?;
        self.send(
            self.request(Method::PUT, &["wiki", "pages", id])?
                .json(&body),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_wiki_page(&self, id: &str) -> GatewayResult<Value> {
        let id = require_id(id, "Wiki page")?;
        self.send(self.request(Method::DELETE, &["wiki", "pages", id])?)
            .await
    }

    #[instrument(skip_all)]
    pub async fn upload_wiki_media(&self, input: &RawInput) -> GatewayResult<Value> {
        let body: UploadWikiMediaRequest = self
            .prepare(registry::upload_wiki_media(), input)?
            .into_typed()?;
        self.send(self.request(Method::POST, &["wiki", "media"])?.json(&body))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_wiki_media(&self, id: &str) -> GatewayResult<Value> {
        let id = require_id(id, "Media")?;
        self.send(self.request(Method::GET, &["wiki", "media", id])?)
            .await
    }

    #[instrument(skip_all)]
    pub async fn search_wiki(&self, input: &RawInput) -> GatewayResult<Value> {
        let query: WikiSearchQuery = self
            .prepare(registry::wiki_search(), input)?
            .into_typed()?;
        self.send(
            self.request(Method::GET, &["wiki", "search"])?
                .query(&query),
        )
        .await
    }

    // =========================================================================
    // Health
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn health_check(&self) -> GatewayResult<Value> {
        self.send(self.request(Method::GET, &["health"])?).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Repair string-encoded arrays, then validate.
    fn prepare(&self, schema: &Schema, input: &RawInput) -> GatewayResult<ValidatedRequest> {
        let coerced = coerce_array_fields(input, &schema.array_fields());
        Ok(schema.validate(&coerced)?)
    }

    /// [`prepare`](Self::prepare), filling `projectId` from the default
    /// project when the caller left it out.
    fn prepare_scoped(
        &self,
        schema: &Schema,
        input: &RawInput,
    ) -> GatewayResult<ValidatedRequest> {
        let supplied = input.get("projectId").is_some_and(|v| !v.is_null());
        match &self.default_project_id {
            Some(project_id) if !supplied => {
                let mut scoped = input.clone();
                scoped.insert("projectId".to_string(), Value::String(project_id.clone()));
                self.prepare(schema, &scoped)
            }
            _ => self.prepare(schema, input),
        }
    }

    /// Build a request for `segments` under the base URL. Each segment is
    /// percent-encoded, so identifiers cannot escape their path position.
    fn request(&self, method: Method, segments: &[&str]) -> GatewayResult<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::RequestConstruction {
                message: format!("upstream URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);

        debug!(%method, %url, "upstream request");
        Ok(self.http.request(method, url))
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Value> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "upstream call failed without a response");
            GatewayError::from(e)
        })?;
        handle_response(response).await
    }
}

/// Decode a response: 2xx bodies pass through, anything else becomes
/// [`GatewayError::Upstream`].
async fn handle_response(response: Response) -> GatewayResult<Value> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        debug!(status = status.as_u16(), "upstream call succeeded");
        Ok(decode_body(&text))
    } else {
        let message = error_message(&text, status);
        warn!(status = status.as_u16(), %message, "upstream returned an error");
        Err(GatewayError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

/// Empty bodies decode to `null`, non-JSON bodies to a JSON string.
pub(super) fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Prefer the upstream's `message`, then `error`, then the status text.
pub(super) fn error_message(text: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            ["message", "error"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

pub(super) fn require_id<'a>(id: &'a str, entity: &str) -> GatewayResult<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        Err(GatewayError::missing_id(entity))
    } else {
        Ok(id)
    }
}
