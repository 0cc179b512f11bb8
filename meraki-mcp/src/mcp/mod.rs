//! Model Context Protocol (MCP) server support
//!
//! Every Dashboard API endpoint in the catalog is exposed as one tool. The
//! [`server::MerakiMcpServer`] resolves `tools/call` requests through the
//! [`tool_registry::ToolRegistry`] and returns each tool's markdown output.

/// Lenient argument conversion
pub mod args;

/// Catalog-driven tool implementation
pub mod endpoint_tool;

/// Markdown rendering of API results
pub mod formatting;

/// Typed outcome to `CallToolResult` conversion
pub mod responses;

/// rmcp server handler
pub mod server;

/// Tool trait, registry and invocation context
pub mod tool_registry;

/// Per-category tool registration
pub mod tools;

pub use endpoint_tool::EndpointTool;
pub use server::MerakiMcpServer;
pub use tool_registry::{
    McpTool, RegistrySummary, ToolContext, ToolPolicy, ToolRegistry,
    MAX_TOOL_NAME_LENGTH,
};
pub use tools::register_all_tools;
