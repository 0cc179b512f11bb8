//! Markdown rendering of Dashboard API results
//!
//! Lists become a count plus a short preview, objects a bulleted field dump
//! and scalars their JSON text. Every response starts with the tool name as
//! a heading.

use serde_json::Value;

/// Text returned when the API answered with nothing
pub const NO_DATA_SENTINEL: &str = "No data returned.";

/// Fields used to summarise one list entry, most descriptive first
const SUMMARY_KEYS: [&str; 8] = [
    "name", "id", "serial", "mac", "model", "status", "email", "networkId",
];

/// Longest rendering of a nested value before it is cut
pub const MAX_VALUE_CHARS: usize = 200;

/// Formatting helpers shared by the response renderers
pub struct McpFormatter;

impl McpFormatter {
    /// Format a preview of long text content, cutting on a character boundary
    pub fn format_preview(content: &str, max_length: usize) -> String {
        match content.char_indices().nth(max_length) {
            None => content.to_string(),
            Some((cut, _)) => format!("{}...", &content[..cut]),
        }
    }

    /// Create a standardized summary for list operations
    pub fn format_list_summary(item_name: &str, count: usize, total: usize) -> String {
        let plural_name = if total == 1 {
            item_name.to_string()
        } else {
            format!("{item_name}s")
        };

        if count == total {
            format!("Found {total} {plural_name}")
        } else {
            format!("Showing {count} of {total} {plural_name}")
        }
    }
}

/// True for `null`, `[]`, `{}` and the empty string
pub fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Render a successful result under a `# <tool>` heading
pub fn render_value(tool: &str, value: &Value, preview_items: usize) -> String {
    let body = if is_empty_result(value) {
        NO_DATA_SENTINEL.to_string()
    } else {
        match value {
            Value::Array(items) => render_list(items, preview_items),
            Value::Object(map) => render_object(map),
            scalar => inline_value(scalar),
        }
    };

    format!("# {tool}\n\n{body}")
}

fn render_list(items: &[Value], preview_items: usize) -> String {
    let total = items.len();
    let shown = total.min(preview_items);

    let mut out = McpFormatter::format_list_summary("item", total, total);
    if shown > 0 {
        out.push_str("\n\n");
        let lines: Vec<String> = items
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, summarize_item(item)))
            .collect();
        out.push_str(&lines.join("\n"));
    }

    let omitted = total - shown;
    if omitted > 0 {
        out.push_str(&format!(
            "\n\n_{}, {omitted} more not displayed_",
            McpFormatter::format_list_summary("item", shown, total)
        ));
    }
    out
}

fn render_object(map: &serde_json::Map<String, Value>) -> String {
    map.iter()
        .map(|(key, value)| format!("- **{key}**: {}", inline_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line description of a list entry
pub fn summarize_item(item: &Value) -> String {
    match item {
        Value::Object(map) => {
            let parts: Vec<String> = SUMMARY_KEYS
                .iter()
                .filter_map(|key| {
                    map.get(*key)
                        .filter(|v| !v.is_null())
                        .map(|v| format!("**{key}**: {}", inline_value(v)))
                })
                .collect();

            if parts.is_empty() {
                inline_value(item)
            } else {
                parts.join(", ")
            }
        }
        other => inline_value(other),
    }
}

/// Compact single-line rendering, strings unquoted, long values cut
pub fn inline_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    McpFormatter::format_preview(&text, MAX_VALUE_CHARS)
}
