//! Endpoint catalog entry types

use super::Category;
use crate::client::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Argument type as exposed in the tool's input schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Free text
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Number,
    /// true/false flag
    Boolean,
    /// List of strings, also accepted as a comma separated string
    StringList,
    /// Arbitrary JSON, also accepted as a string containing JSON
    Json,
}

impl ParamType {
    /// JSON Schema fragment for this type
    ///
    /// Lists and numbers also accept their string spellings since many MCP
    /// clients send every argument as text.
    pub fn json_schema(self) -> Value {
        match self {
            ParamType::String => json!({ "type": "string" }),
            ParamType::Integer => json!({ "type": ["integer", "string"] }),
            ParamType::Number => json!({ "type": ["number", "string"] }),
            ParamType::Boolean => json!({ "type": ["boolean", "string"] }),
            ParamType::StringList => json!({
                "type": ["array", "string"],
                "items": { "type": "string" }
            }),
            ParamType::Json => json!({}),
        }
    }
}

/// Where an argument is placed in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamLocation {
    /// Substituted into the path template
    Path,
    /// Sent in the query string
    Query,
    /// Sent as a field of the JSON body
    Body,
}

/// How much a tool can change Dashboard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Safety {
    /// No side effects
    Read,
    /// Creates or updates configuration
    Write,
    /// Deletes configuration or disrupts devices
    Destructive,
}

impl Safety {
    /// Default safety for an HTTP verb
    pub fn for_method(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Safety::Read,
            HttpMethod::Delete => Safety::Destructive,
            HttpMethod::Post | HttpMethod::Put => Safety::Write,
        }
    }

    /// True for `write` and `destructive`
    pub fn mutates(self) -> bool {
        self != Safety::Read
    }

    /// Lower case name
    pub fn as_str(self) -> &'static str {
        match self {
            Safety::Read => "read",
            Safety::Write => "write",
            Safety::Destructive => "destructive",
        }
    }
}

/// One argument of an endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// snake_case name exposed to the client
    pub name: String,
    /// Vendor field name
    pub api: String,
    /// Placement in the request
    pub location: ParamLocation,
    /// Accepted value type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Must be supplied by the caller
    pub required: bool,
    /// Human readable description
    pub description: String,
    /// Value used when the caller omits the argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// One Dashboard API operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSpec {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// API category the endpoint belongs to
    pub category: Category,
    /// HTTP verb
    pub method: HttpMethod,
    /// Path template with `{apiName}` placeholders
    pub path: String,
    /// Arguments in declaration order
    pub params: Vec<ParamSpec>,
    /// Side-effect level
    pub safety: Safety,
    /// Supports `Link rel=next` pagination
    pub paginated: bool,
}

impl EndpointSpec {
    /// Look up an argument by its exposed name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Placeholder names in the path template, in order
    pub fn path_placeholders(&self) -> Vec<&str> {
        path_placeholders(&self.path)
    }

    /// Arguments the caller must supply
    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }
}

/// Placeholder names of a `{name}` style template
pub fn path_placeholders(template: &str) -> Vec<&str> {
    let mut placeholders = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                placeholders.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    placeholders
}
