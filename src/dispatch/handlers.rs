//! One handler per operation, adapting raw parameters to client calls.

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::schema::RawInput;
use crate::upstream::{GatewayResult, UpstreamClient};

/// Signature shared by every registered operation.
pub type Handler =
    for<'a> fn(&'a UpstreamClient, RawInput) -> BoxFuture<'a, GatewayResult<Value>>;

/// Remove an identifier from the parameters so it never reaches a body.
///
/// Missing, `null` and non-scalar values yield an empty string, which the
/// client rejects as a missing id.
pub fn take_id(params: &mut RawInput, key: &str) -> String {
    match params.remove(key) {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

macro_rules! handler {
    ($name:ident, |$client:ident, $params:ident| $body:expr) => {
        pub(super) fn $name<'a>(
            $client: &'a UpstreamClient,
            #[allow(unused_mut)] mut $params: RawInput,
        ) -> BoxFuture<'a, GatewayResult<Value>> {
            Box::pin(async move { $body })
        }
    };
}

// =============================================================================
// Projects
// =============================================================================

handler!(get_projects, |client, _params| client.get_projects().await);

handler!(get_project, |client, params| {
    let id = take_id(&mut params, "id");
    client.get_project(&id).await
});

// =============================================================================
// Tasks
// =============================================================================

handler!(get_tasks, |client, params| client.get_tasks(&params).await);

handler!(get_task, |client, params| {
    let id = take_id(&mut params, "id");
    client.get_task(&id).await
});

handler!(create_task, |client, params| client.create_task(&params).await);

handler!(update_task_status, |client, params| {
    let id = take_id(&mut params, "id");
    client.update_task_status(&id, &params).await
});

handler!(update_task, |client, params| {
    let id = take_id(&mut params, "id");
    client.update_task(&id, &params).await
});

// =============================================================================
// Epics
// =============================================================================

handler!(get_epics, |client, params| client.get_epics(&params).await);

handler!(create_epic, |client, params| client.create_epic(&params).await);

handler!(update_epic, |client, params| {
    let id = take_id(&mut params, "id");
    client.update_epic(&id, &params).await
});

// =============================================================================
// Comments & attachments
// =============================================================================

handler!(get_comments, |client, params| {
    let task_id = take_id(&mut params, "taskId");
    client.get_comments(&task_id).await
});

handler!(add_comment, |client, params| client.create_comment(&params).await);

handler!(get_attachments, |client, params| client.get_attachments(&params).await);

handler!(upload_attachment, |client, params| client.upload_attachment(&params).await);

handler!(download_attachment, |client, params| {
    let id = take_id(&mut params, "attachmentId");
    client.download_attachment(&id).await
});

// =============================================================================
// Wiki
// =============================================================================

handler!(get_wiki_spaces, |client, params| {
    let project_id = take_id(&mut params, "projectId");
    client.get_wiki_spaces(&project_id).await
});

handler!(create_wiki_space, |client, params| client.create_wiki_space(&params).await);

handler!(get_wiki_pages, |client, params| client.get_wiki_pages(&params).await);

handler!(get_wiki_page, |client, params| {
    let id = take_id(&mut params, "id");
    client.get_wiki_page(&id).await
});

handler!(create_wiki_page, |client, params| client.create_wiki_page(&params).await);

handler!(update_wiki_page, |client, params| {
    let id = take_id(&mut params, "id");
    client.update_wiki_page(&id, &params).await
});

handler!(delete_wiki_page, |client, params| {
    let id = take_id(&mut params, "id");
    client.delete_wiki_page(&id).await
});

handler!(upload_wiki_media, |client, params| client.upload_wiki_media(&params).await);

handler!(get_wiki_media, |client, params| {
    let id = take_id(&mut params, "id");
    client.get_wiki_media(&id).await
});

handler!(search_wiki, |client, params| client.search_wiki(&params).await);
