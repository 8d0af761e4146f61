// crates/openprodoc-mcp/src/mcp/handler.rs
// MCP ServerHandler implementation

use super::ProdocServer;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::tool::ToolCallContext,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};

const INSTRUCTIONS: &str = "OpenProdoc document management. Call openprodoc_login first; \
every other tool needs the session token it stores. Folders can be addressed by ID or by path, \
never both. Searches take SQL-like queries with a mandatory WHERE clause.";

impl ServerHandler for ProdocServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "openprodoc-mcp".into(),
                title: Some("OpenProdoc MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let tool_name = request.name.to_string();
            let start = std::time::Instant::now();

            let ctx = ToolCallContext::new(self, request, context);
            let result = self.tool_router.call(ctx).await;

            let success = match &result {
                Ok(r) => !r.is_error.unwrap_or(false),
                Err(_) => false,
            };
            tracing::debug!(
                tool = %tool_name,
                success,
                duration_ms = start.elapsed().as_millis() as u64,
                "Tool call finished"
            );

            result
        }
    }
}
