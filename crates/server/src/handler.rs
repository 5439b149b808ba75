//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::kagi_search::{KagiSearchParams, search_impl};
use kagi_core::AppConfig;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-kagi.
#[derive(Clone)]
pub struct McpKagiServer {
    config: Arc<AppConfig>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpKagiServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig) -> Self {
        Self { config: Arc::new(config), tool_router: Self::tool_router() }
    }

    /// Search the web through Kagi.
    ///
    /// Performs exactly one upstream request and returns the raw JSON response as text.
    #[tool(
        description = "Search the web using Kagi Search API. Provides high-quality, ad-free search results with privacy protection."
    )]
    async fn kagi_search(&self, params: Parameters<KagiSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.config, params.0).await
    }
}

impl ServerHandler for McpKagiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-kagi".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
