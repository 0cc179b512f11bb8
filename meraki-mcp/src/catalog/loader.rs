//! Parsing of the embedded YAML catalog documents
//!
//! Documents stay terse by leaning on conventions:
//!
//! - a parameter may be given as a bare name; well-known names such as
//!   `network_id` or `per_page` carry their own type and description
//! - `api` defaults to the camelCase form of `name`
//! - a parameter whose `api` name appears as `{api}` in the path is a
//!   required path parameter; otherwise GET/DELETE parameters go to the
//!   query string and POST/PUT parameters to the JSON body
//! - `safety` defaults from the HTTP method
//! - `paginated` defaults to true when a `per_page` parameter exists

use super::spec::{path_placeholders, EndpointSpec, ParamLocation, ParamSpec, ParamType, Safety};
use super::Category;
use crate::client::HttpMethod;
use crate::error::{MerakiMcpError, Result};
use crate::mcp::args::snake_to_camel;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Argument names the endpoint tool adds itself
pub const RESERVED_PARAM_NAMES: [&str; 2] = ["confirmed", "total_pages"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    endpoints: Vec<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEndpoint {
    name: String,
    description: String,
    method: HttpMethod,
    path: String,
    #[serde(default)]
    params: Vec<RawParam>,
    safety: Option<Safety>,
    paginated: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawParam {
    Name(String),
    Full(RawParamSpec),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParamSpec {
    name: String,
    api: Option<String>,
    #[serde(rename = "in")]
    location: Option<ParamLocation>,
    #[serde(rename = "type")]
    param_type: Option<ParamType>,
    required: Option<bool>,
    description: Option<String>,
    default: Option<Value>,
}

/// Type and description of parameters that recur across the API
const WELL_KNOWN_PARAMS: &[(&str, ParamType, &str)] = &[
    ("organization_id", ParamType::String, "Organization ID"),
    ("network_id", ParamType::String, "Network ID"),
    ("serial", ParamType::String, "Device serial number"),
    ("number", ParamType::Integer, "SSID number (0-14)"),
    ("per_page", ParamType::Integer, "Number of entries per page"),
    ("starting_after", ParamType::String, "Return entries after this pagination token"),
    ("ending_before", ParamType::String, "Return entries before this pagination token"),
    ("timespan", ParamType::Integer, "Timespan in seconds for which data is returned"),
    ("t0", ParamType::String, "Start of the reporting window (ISO 8601)"),
    ("t1", ParamType::String, "End of the reporting window (ISO 8601)"),
    ("network_ids", ParamType::StringList, "Filter by network IDs"),
    ("serials", ParamType::StringList, "Filter by device serial numbers"),
    ("product_types", ParamType::StringList, "Filter by product types"),
    ("models", ParamType::StringList, "Filter by device models"),
    ("macs", ParamType::StringList, "Filter by MAC addresses"),
    ("tags", ParamType::StringList, "Tags"),
    ("metrics", ParamType::StringList, "Metrics to return"),
    ("name", ParamType::String, "Name"),
    ("notes", ParamType::String, "Notes"),
    ("address", ParamType::String, "Physical address"),
    ("time_zone", ParamType::String, "IANA time zone, e.g. America/Los_Angeles"),
    ("port_id", ParamType::String, "Switch port ID"),
    ("vlan_id", ParamType::String, "VLAN ID"),
    ("client_id", ParamType::String, "Client ID or MAC address"),
    ("admin_id", ParamType::String, "Administrator ID"),
    ("http_server_id", ParamType::String, "Webhook HTTP server ID"),
    ("license_id", ParamType::String, "License ID"),
    ("rules", ParamType::Json, "Rules as a JSON array"),
    ("enabled", ParamType::Boolean, "Whether the feature is enabled"),
    ("url", ParamType::String, "URL"),
    ("shared_secret", ParamType::String, "Shared secret sent with each request"),
    ("email", ParamType::String, "Email address"),
    ("lat", ParamType::Number, "Latitude"),
    ("lng", ParamType::Number, "Longitude"),
    ("ids", ParamType::StringList, "Filter by IDs"),
];

fn well_known(name: &str) -> Option<(ParamType, &'static str)> {
    WELL_KNOWN_PARAMS
        .iter()
        .find(|(known, _, _)| *known == name)
        .map(|(_, param_type, description)| (*param_type, *description))
}

fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn catalog_error(category: Category, message: impl Into<String>) -> MerakiMcpError {
    MerakiMcpError::Catalog {
        category: category.as_str().to_string(),
        message: message.into(),
    }
}

/// Parse and validate one catalog document
pub fn parse_catalog(category: Category, source: &str) -> Result<Vec<EndpointSpec>> {
    let raw: RawCatalog =
        serde_yaml::from_str(source).map_err(|e| catalog_error(category, e.to_string()))?;

    let mut seen = HashSet::new();
    let mut endpoints = Vec::with_capacity(raw.endpoints.len());
    for raw_endpoint in raw.endpoints {
        if !seen.insert(raw_endpoint.name.clone()) {
            return Err(catalog_error(
                category,
                format!("endpoint '{}' is declared twice", raw_endpoint.name),
            ));
        }
        endpoints.push(resolve_endpoint(category, raw_endpoint)?);
    }

    Ok(endpoints)
}

/// Parse the embedded document for `category`
pub fn load_category(category: Category) -> Result<Vec<EndpointSpec>> {
    let endpoints = parse_catalog(category, category.source())?;
    tracing::debug!("Loaded {} endpoints for {}", endpoints.len(), category);
    Ok(endpoints)
}

fn resolve_endpoint(category: Category, raw: RawEndpoint) -> Result<EndpointSpec> {
    let placeholders: Vec<String> = path_placeholders(&raw.path)
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut params = Vec::with_capacity(raw.params.len());
    let mut names = HashSet::new();
    for raw_param in raw.params {
        let param = resolve_param(raw.method, &placeholders, raw_param);

        if RESERVED_PARAM_NAMES.contains(&param.name.as_str()) {
            return Err(catalog_error(
                category,
                format!("'{}' uses reserved parameter name '{}'", raw.name, param.name),
            ));
        }
        if !names.insert(param.name.clone()) {
            return Err(catalog_error(
                category,
                format!("'{}' declares parameter '{}' twice", raw.name, param.name),
            ));
        }
        if param.location == ParamLocation::Path && !placeholders.contains(&param.api) {
            return Err(catalog_error(
                category,
                format!(
                    "'{}' parameter '{}' is in the path but '{{{}}}' is not in {}",
                    raw.name, param.name, param.api, raw.path
                ),
            ));
        }
        params.push(param);
    }

    for placeholder in &placeholders {
        let covered = params
            .iter()
            .any(|p| p.location == ParamLocation::Path && &p.api == placeholder);
        if !covered {
            return Err(catalog_error(
                category,
                format!(
                    "'{}' has no parameter for path placeholder '{{{}}}'",
                    raw.name, placeholder
                ),
            ));
        }
    }

    let paginated = raw
        .paginated
        .unwrap_or_else(|| params.iter().any(|p| p.name == "per_page"));

    Ok(EndpointSpec {
        name: raw.name,
        description: raw.description.trim().to_string(),
        category,
        method: raw.method,
        path: raw.path,
        params,
        safety: raw.safety.unwrap_or_else(|| Safety::for_method(raw.method)),
        paginated,
    })
}

fn resolve_param(method: HttpMethod, placeholders: &[String], raw: RawParam) -> ParamSpec {
    let spec = match raw {
        RawParam::Name(name) => RawParamSpec {
            name,
            api: None,
            location: None,
            param_type: None,
            required: None,
            description: None,
            default: None,
        },
        RawParam::Full(spec) => spec,
    };

    let known = well_known(&spec.name);
    let api = spec.api.unwrap_or_else(|| snake_to_camel(&spec.name));
    let in_path = placeholders.contains(&api);
    let location = spec.location.unwrap_or(if in_path {
        ParamLocation::Path
    } else if method.has_body() {
        ParamLocation::Body
    } else {
        ParamLocation::Query
    });
    let required = location == ParamLocation::Path || spec.required.unwrap_or(false);

    ParamSpec {
        param_type: spec
            .param_type
            .or(known.map(|(t, _)| t))
            .unwrap_or(ParamType::String),
        description: spec
            .description
            .or(known.map(|(_, d)| d.to_string()))
            .unwrap_or_else(|| humanize(&spec.name)),
        name: spec.name,
        api,
        location,
        required,
        default: spec.default,
    }
}
