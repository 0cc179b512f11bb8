//! MCP server exposing the Dashboard API tools

use crate::client::{DashboardApi, HttpDashboardClient};
use crate::config::Config;
use crate::error::{MerakiMcpError, Result};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::responses::render_error;
use super::tool_registry::{ToolContext, ToolPolicy, ToolRegistry};
use super::tools::register_all_tools;

const SERVER_NAME: &str = "meraki-mcp";

const INSTRUCTIONS: &str = "Tools for the Cisco Meraki Dashboard API. \
Each tool calls one Dashboard endpoint and returns markdown. Most tools need an \
organization_id, network_id or device serial; start with get_organizations and \
get_organization_networks to discover them. List tools fetch one page by default; \
pass total_pages=-1 to follow every page. Destructive tools (deletes, reboots, wipes) \
answer with a confirmation request until called again with confirmed=true. When the \
server runs in read-only mode every tool that changes configuration is refused.";

/// MCP server for the Meraki Dashboard API
#[derive(Clone)]
pub struct MerakiMcpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl MerakiMcpServer {
    /// Create a server talking to the Dashboard over HTTPS
    ///
    /// # Errors
    ///
    /// Returns an error when the API key is missing, the configuration is
    /// invalid or the tool catalog fails to register.
    pub fn new(config: &Config) -> Result<Self> {
        let api = HttpDashboardClient::from_config(config)?;
        Self::with_api(config, Arc::new(api))
    }

    /// Create a server using the given Dashboard implementation
    pub fn with_api(config: &Config, api: Arc<dyn DashboardApi>) -> Result<Self> {
        let categories = config.enabled_categories()?;

        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry, &categories)?;

        let context = ToolContext::new(api, ToolPolicy::from_config(config));
        Ok(Self::from_parts(registry, context))
    }

    /// Assemble a server from an already populated registry
    pub fn from_parts(tool_registry: ToolRegistry, tool_context: ToolContext) -> Self {
        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(tool_context),
        }
    }

    /// The populated tool registry
    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Resolve and run a tool
    ///
    /// An unknown name is a protocol error; every other failure is returned
    /// in band by the tool itself.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tool = self.tool_registry.resolve(name).map_err(|e| {
            tracing::warn!("{}", e);
            McpError::invalid_params(e.to_string(), None)
        })?;
        tool.execute(arguments, &self.tool_context).await
    }

    /// [`dispatch`](Self::dispatch), abandoned as soon as `ct` is cancelled
    ///
    /// Cancellation is reported in band like any other tool failure.
    pub async fn dispatch_cancellable(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        ct: CancellationToken,
    ) -> std::result::Result<CallToolResult, McpError> {
        tokio::select! {
            result = self.dispatch(name, arguments) => result,
            _ = ct.cancelled() => {
                tracing::warn!("Tool {} cancelled by the client", name);
                Ok(render_error(&MerakiMcpError::Cancelled { tool: name.to_string() }))
            }
        }
    }
}

impl ServerHandler for MerakiMcpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();
        self.dispatch_cancellable(&request.name, arguments, context.ct)
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
