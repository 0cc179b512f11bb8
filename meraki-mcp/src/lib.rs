//! # meraki-mcp
//!
//! Model Context Protocol tools for the Cisco Meraki Dashboard API.
//!
//! ## Features
//!
//! - **Endpoint Catalog**: Dashboard API operations declared as YAML data, one
//!   document per API category
//! - **Generic Tool Wrapper**: a single tool type interprets catalog entries,
//!   translating arguments and rendering JSON results as markdown
//! - **Tool Registry**: name validation, duplicate detection and ordered listing
//! - **MCP Server**: an `rmcp` server handler dispatching tool calls
//! - **Dashboard Client**: reqwest based client with pacing, retries and pagination
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meraki_mcp::{Config, MerakiMcpServer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let server = MerakiMcpServer::new(&config)?;
//! println!("{} tools registered", server.tool_registry().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Declarative Dashboard API endpoint catalog
pub mod catalog;

/// Dashboard API client abstractions and implementations
pub mod client;

/// Shared utilities
pub mod common;

/// Configuration loading and validation
pub mod config;

/// Error types used throughout the library
pub mod error;

/// Model Context Protocol (MCP) server support
pub mod mcp;

pub use catalog::{Category, EndpointSpec, ParamLocation, ParamSpec, ParamType, Safety};
pub use client::{ApiRequest, DashboardApi, HttpDashboardClient, HttpMethod};
pub use config::{Config, ConfigError};
pub use error::{MerakiMcpError, Result};
pub use mcp::{MerakiMcpServer, McpTool, ToolContext, ToolPolicy, ToolRegistry, MAX_TOOL_NAME_LENGTH};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ApiRequest, Category, Config, DashboardApi, EndpointSpec, HttpDashboardClient,
        MerakiMcpError, MerakiMcpServer, McpTool, Result, ToolContext, ToolPolicy, ToolRegistry,
    };
}
