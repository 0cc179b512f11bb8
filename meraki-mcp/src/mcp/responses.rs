//! Response creation utilities for MCP operations
//!
//! Tool outcomes stay typed until here. Success becomes markdown, a pending
//! confirmation becomes instructions for the caller, and every other error
//! becomes failure text flagged with `is_error`.

use super::formatting::render_value;
use crate::error::{MerakiMcpError, Result};
use rmcp::model::*;
use serde_json::Value;

/// Prefix of every failure text
pub const FAILURE_MARKER: &str = "❌";

/// Prefix of the text returned when a destructive call needs confirmation
pub const CONFIRMATION_MARKER: &str = "⚠️ Confirmation required";

/// Create a success response for MCP tool calls
pub fn create_success_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(false),
    }
}

/// Create an error response for MCP tool calls
pub fn create_error_response(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text: message }),
            None,
        )],
        is_error: Some(true),
    }
}

/// Render a successful Dashboard result
pub fn render_success(tool: &str, value: &Value, preview_items: usize) -> CallToolResult {
    create_success_response(render_value(tool, value, preview_items))
}

/// Render a failed or gated invocation as in-band text
pub fn render_error(error: &MerakiMcpError) -> CallToolResult {
    match error {
        MerakiMcpError::ConfirmationRequired { tool, action } => {
            create_success_response(format!(
                "{CONFIRMATION_MARKER}\n\n\
                 `{tool}` will {action}. This cannot be undone.\n\n\
                 Call `{tool}` again with the same arguments and `confirmed: true` to proceed."
            ))
        }
        other => {
            let mut text = format!("{FAILURE_MARKER} {other}");
            if let Some(hint) = failure_hint(other) {
                text.push_str("\n\n");
                text.push_str(hint);
            }
            create_error_response(text)
        }
    }
}

/// Render the outcome of one tool invocation
pub fn render_outcome(tool: &str, outcome: Result<Value>, preview_items: usize) -> CallToolResult {
    match outcome {
        Ok(value) => render_success(tool, &value, preview_items),
        Err(error) => render_error(&error),
    }
}

fn failure_hint(error: &MerakiMcpError) -> Option<&'static str> {
    match error {
        MerakiMcpError::Api { status: 401, .. } => {
            Some("Check that MERAKI_API_KEY holds a valid Dashboard API key.")
        }
        MerakiMcpError::Api { status: 403, .. } => {
            Some("The API key does not have access to this organization or network.")
        }
        MerakiMcpError::Api { status: 404, .. } => {
            Some("Check the identifiers passed to the tool; the resource was not found.")
        }
        MerakiMcpError::Api { status: 429, .. } => {
            Some("The Dashboard rate limit was exceeded. Wait a moment and retry.")
        }
        MerakiMcpError::ReadOnlyMode { .. } => {
            Some("Disable read-only mode (MERAKI_READ_ONLY_MODE=false) to allow changes.")
        }
        _ => None,
    }
}

/// Text of the first content item, used by tests and the CLI
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
