//! MCP server implementation
//!
//! Every registered operation is exposed as a tool. Tool calls go straight
//! to the [`Dispatcher`], the same path the HTTP shell uses.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, Content, JsonObject, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use serde_json::Value;
use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::upstream::{GatewayError, GatewayResult};

#[derive(Clone)]
pub struct McpServer {
    dispatcher: Dispatcher,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// One tool per registered operation, in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher
            .registry()
            .iter()
            .map(|operation| {
                let input_schema = match operation.schema.json_schema() {
                    Value::Object(schema) => schema,
                    _ => JsonObject::new(),
                };
                Tool::new(operation.name, operation.description, Arc::new(input_schema))
            })
            .collect()
    }

    /// Run a tool. Failures become error-flagged text, never protocol errors.
    pub async fn call(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        let params = arguments.map_or(Value::Null, Value::Object);
        render(self.dispatcher.dispatch(name, params).await)
    }
}

fn render(result: GatewayResult<Value>) -> CallToolResult {
    let text =
        result.and_then(|data| serde_json::to_string_pretty(&data).map_err(GatewayError::from));
    match text {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!("Error: {e}"))]),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "Taskbridge MCP Server - Manage projects, tasks, epics, comments, attachments, and wiki pages",
        )
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.tools();
        debug!("Listing {} tools", tools.len());
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(&request.name, request.arguments).await)
    }
}
