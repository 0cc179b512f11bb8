//! Unified error handling for the meraki-mcp library
//!
//! Registration, dispatch, invocation and Dashboard API failures share one
//! typed error enum. Tool wrappers never hand these to the MCP client as
//! protocol errors; `mcp::responses` renders them into in-band text.

use crate::config::ConfigError;
use crate::mcp::tool_registry::MAX_TOOL_NAME_LENGTH;
use std::fmt;
use std::io;
use thiserror::Error;

/// The main error type for the meraki-mcp library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MerakiMcpError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An embedded endpoint catalog document is malformed
    #[error("Invalid endpoint catalog '{category}': {message}")]
    Catalog {
        /// Catalog category whose document failed to load
        category: String,
        /// What was wrong with it
        message: String,
    },

    /// A tool with the same name is already registered
    #[error("Duplicate tool name: '{0}' is already registered")]
    DuplicateToolName(String),

    /// The tool name exceeds the client compatibility limit
    #[error("Tool name '{name}' is {length} characters long (max {max})", max = MAX_TOOL_NAME_LENGTH)]
    ToolNameTooLong {
        /// Offending tool name
        name: String,
        /// Its length in characters
        length: usize,
    },

    /// The tool name is empty or contains unsupported characters
    #[error("Invalid tool name '{name}': {reason}")]
    InvalidToolName {
        /// Offending tool name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// No tool is registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments are missing or cannot be converted
    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments {
        /// Tool that received the arguments
        tool: String,
        /// Description of the problem
        message: String,
    },

    /// A destructive tool was called without `confirmed=true`
    #[error("Confirmation required for '{tool}': {action}")]
    ConfirmationRequired {
        /// Destructive tool name
        tool: String,
        /// Human readable description of what would happen
        action: String,
    },

    /// A mutating tool was called while read-only mode is enabled
    #[error("'{tool}' modifies Dashboard state and read-only mode is enabled")]
    ReadOnlyMode {
        /// Mutating tool name
        tool: String,
    },

    /// The Dashboard API answered with a non-success status
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error text reported by the API
        message: String,
    },

    /// The HTTP request could not be completed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call did not finish within the configured timeout
    #[error("'{tool}' timed out after {seconds} seconds")]
    Timeout {
        /// Tool whose call timed out
        tool: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The client cancelled the request while the call was in flight
    #[error("'{tool}' was cancelled by the client")]
    Cancelled {
        /// Tool whose call was cancelled
        tool: String,
    },

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// Context message
        message: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type alias for meraki-mcp operations
pub type Result<T> = std::result::Result<T, MerakiMcpError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| MerakiMcpError::Context {
            message: msg.into(),
            source: Box::new(e),
        })
    }
}

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.0)?;

        let mut current = self.0.source();
        let mut level = 1;

        while let Some(err) = current {
            writeln!(f, "{:indent$}Caused by: {}", "", err, indent = level * 2)?;
            current = err.source();
            level += 1;
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}
