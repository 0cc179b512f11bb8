//! Generic tool that calls one Dashboard API endpoint
//!
//! An [`EndpointTool`] is built from a catalog [`EndpointSpec`]. It derives
//! its input schema from the declared parameters, translates the caller's
//! arguments into an [`ApiRequest`], applies the read-only and confirmation
//! policy and renders the outcome.

use super::args::{convert, fill_path, path_segment};
use super::responses::render_outcome;
use super::tool_registry::{McpTool, ToolContext};
use crate::catalog::{Category, EndpointSpec, ParamLocation, ParamType, Safety};
use crate::client::ApiRequest;
use crate::error::{MerakiMcpError, Result};
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Argument a destructive tool needs set to `true`
pub const CONFIRMED_ARG: &str = "confirmed";

/// Argument controlling how many pages a paginated tool follows
pub const TOTAL_PAGES_ARG: &str = "total_pages";

/// Path placeholders that scope client-side pacing, in order of preference
const RATE_LIMIT_SCOPES: [(&str, &str); 3] = [
    ("organizationId", "organization"),
    ("networkId", "network"),
    ("serial", "device"),
];

/// MCP tool backed by a single catalog entry
#[derive(Debug, Clone)]
pub struct EndpointTool {
    spec: EndpointSpec,
    description: String,
    schema: Value,
}

impl EndpointTool {
    /// Build the tool, its description and its input schema
    pub fn new(spec: EndpointSpec) -> Self {
        let description = describe(&spec);
        let schema = input_schema(&spec);
        Self {
            spec,
            description,
            schema,
        }
    }

    fn invalid(&self, message: impl Into<String>) -> MerakiMcpError {
        MerakiMcpError::InvalidArguments {
            tool: self.spec.name.clone(),
            message: message.into(),
        }
    }

    /// Translate caller arguments into a Dashboard request
    ///
    /// Declared defaults fill omitted arguments. Missing required arguments
    /// and values that cannot be converted fail with `InvalidArguments`.
    pub fn build_request(&self, arguments: &Map<String, Value>) -> Result<ApiRequest> {
        let mut path_values: HashMap<&str, String> = HashMap::new();
        let mut query: Vec<(String, String)> = Vec::new();
        let mut body = Map::new();

        for param in &self.spec.params {
            let supplied = arguments
                .get(&param.name)
                .filter(|value| !value.is_null())
                .or(param.default.as_ref());

            let Some(raw) = supplied else {
                if param.required {
                    return Err(self.invalid(format!(
                        "missing required argument '{}'",
                        param.name
                    )));
                }
                continue;
            };

            let value = convert(raw, param.param_type)
                .map_err(|e| self.invalid(format!("argument '{}': {e}", param.name)))?;

            match param.location {
                ParamLocation::Path => {
                    let segment = path_segment(&value);
                    if segment.is_empty() {
                        return Err(self.invalid(format!("argument '{}' is empty", param.name)));
                    }
                    path_values.insert(param.api.as_str(), segment);
                }
                ParamLocation::Query => match &value {
                    Value::Array(items) => {
                        let key = format!("{}[]", param.api);
                        query.extend(items.iter().map(|item| (key.clone(), path_segment(item))));
                    }
                    other => query.push((param.api.clone(), path_segment(other))),
                },
                ParamLocation::Body => {
                    body.insert(param.api.clone(), value);
                }
            }
        }

        let path = fill_path(&self.spec.path, |key| path_values.get(key).cloned())
            .map_err(|e| self.invalid(e))?;

        let mut request = ApiRequest::new(self.spec.method, path)
            .with_max_pages(self.page_limit(arguments)?)
            .with_rate_limit_key(rate_limit_key(&path_values));
        request.query = query;
        if self.spec.method.has_body() || !body.is_empty() {
            request = request.with_body(Value::Object(body));
        }

        Ok(request)
    }

    /// Pages to follow: 1 by default, -1 for all
    fn page_limit(&self, arguments: &Map<String, Value>) -> Result<u32> {
        if !self.spec.paginated {
            return Ok(1);
        }

        let Some(raw) = arguments.get(TOTAL_PAGES_ARG).filter(|v| !v.is_null()) else {
            return Ok(1);
        };

        if raw.as_str().is_some_and(|s| s.trim().eq_ignore_ascii_case("all")) {
            return Ok(0);
        }

        let pages = convert(raw, ParamType::Integer)
            .map_err(|e| self.invalid(format!("argument '{TOTAL_PAGES_ARG}': {e}")))?
            .as_i64()
            .unwrap_or(1);

        match pages {
            -1 => Ok(0),
            n if n >= 1 => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
            n => Err(self.invalid(format!(
                "argument '{TOTAL_PAGES_ARG}' must be -1 or a positive number, got {n}"
            ))),
        }
    }

    fn is_confirmed(arguments: &Map<String, Value>) -> bool {
        arguments
            .get(CONFIRMED_ARG)
            .and_then(|value| convert(value, ParamType::Boolean).ok())
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    /// Apply policy, then perform the Dashboard call
    pub async fn invoke(&self, arguments: &Map<String, Value>, context: &ToolContext) -> Result<Value> {
        let policy = &context.policy;

        if policy.read_only_mode && self.spec.safety.mutates() {
            return Err(MerakiMcpError::ReadOnlyMode {
                tool: self.spec.name.clone(),
            });
        }

        if policy.require_confirmations
            && self.spec.safety == Safety::Destructive
            && !Self::is_confirmed(arguments)
        {
            let action = match self.build_request(arguments) {
                Ok(request) => format!("call {request}"),
                Err(_) => format!("call {} {}", self.spec.method, self.spec.path),
            };
            return Err(MerakiMcpError::ConfirmationRequired {
                tool: self.spec.name.clone(),
                action,
            });
        }

        let request = self.build_request(arguments)?;
        tracing::debug!("{} -> {}", self.spec.name, request);

        match tokio::time::timeout(policy.timeout, context.api.call(request)).await {
            Ok(result) => result,
            Err(_) => Err(MerakiMcpError::Timeout {
                tool: self.spec.name.clone(),
                seconds: policy.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl McpTool for EndpointTool {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> Value {
        self.schema.clone()
    }

    fn category(&self) -> Option<Category> {
        Some(self.spec.category)
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        tracing::debug!(
            "Calling tool {} with {} argument(s)",
            self.spec.name,
            arguments.len()
        );

        let outcome = self.invoke(&arguments, context).await;
        match &outcome {
            Err(MerakiMcpError::ConfirmationRequired { .. }) => {
                tracing::info!("{} is waiting for confirmation", self.spec.name);
            }
            Err(e) => tracing::error!("Tool {} failed: {}", self.spec.name, e),
            Ok(_) => {}
        }

        Ok(render_outcome(
            &self.spec.name,
            outcome,
            context.policy.preview_items,
        ))
    }
}

fn describe(spec: &EndpointSpec) -> String {
    match spec.safety {
        Safety::Destructive => format!(
            "{}. Destructive: pass `{CONFIRMED_ARG}: true` to execute.",
            spec.description
        ),
        Safety::Write => format!("{}. Modifies Dashboard configuration.", spec.description),
        Safety::Read => spec.description.clone(),
    }
}

fn input_schema(spec: &EndpointSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &spec.params {
        let mut property = match param.param_type.json_schema() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        property.insert("description".to_string(), json!(param.description));
        if let Some(default) = &param.default {
            property.insert("default".to_string(), default.clone());
        }
        properties.insert(param.name.clone(), Value::Object(property));

        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    if spec.paginated {
        properties.insert(
            TOTAL_PAGES_ARG.to_string(),
            json!({
                "type": ["integer", "string"],
                "description": "Pages to fetch, -1 for all pages",
                "default": 1
            }),
        );
    }

    if spec.safety == Safety::Destructive {
        properties.insert(
            CONFIRMED_ARG.to_string(),
            json!({
                "type": ["boolean", "string"],
                "description": "Must be true to perform this destructive operation",
                "default": false
            }),
        );
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn rate_limit_key(path_values: &HashMap<&str, String>) -> String {
    RATE_LIMIT_SCOPES
        .iter()
        .find_map(|(placeholder, scope)| {
            path_values
                .get(placeholder)
                .map(|value| format!("{scope}:{value}"))
        })
        .unwrap_or_else(|| "global".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{parse_catalog, ParamSpec};
    use crate::client::{HttpMethod, MockDashboardApi};
    use crate::mcp::responses::{first_text, CONFIRMATION_MARKER, FAILURE_MARKER};
    use crate::mcp::tool_registry::ToolPolicy;
    use std::sync::Arc;
    use std::time::Duration;

    const CATALOG: &str = r#"
endpoints:
  - name: get_organization_devices
    description: List the devices in an organization
    method: GET
    path: /organizations/{organizationId}/devices
    params:
      - organization_id
      - per_page
      - serials
      - { name: model, description: Filter by model }
  - name: update_device
    description: Update the attributes of a device
    method: PUT
    path: /devices/{serial}
    params:
      - serial
      - name
      - tags
      - lat
      - { name: move_map_marker, type: boolean, default: false, description: Move the map marker }
  - name: delete_network
    description: Delete a network
    method: DELETE
    path: /networks/{networkId}
    params: [network_id]
"#;

    fn tool(name: &str) -> EndpointTool {
        let specs = parse_catalog(Category::Organizations, CATALOG).unwrap();
        let spec = specs.into_iter().find(|s| s.name == name).unwrap();
        EndpointTool::new(spec)
    }

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    fn context(api: Arc<MockDashboardApi>, policy: ToolPolicy) -> ToolContext {
        ToolContext::new(api, policy)
    }

    #[test]
    fn test_schema_lists_params_and_required() {
        let schema = tool("get_organization_devices").schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["organization_id"].is_object());
        assert!(schema["properties"]["serials"].is_object());
        assert!(schema["properties"][TOTAL_PAGES_ARG].is_object());
        assert!(schema["properties"].get(CONFIRMED_ARG).is_none());
        assert_eq!(schema["required"], json!(["organization_id"]));
    }

    #[test]
    fn test_schema_keeps_declared_param_order() {
        let spec = crate::catalog::load_category(Category::Organizations)
            .unwrap()
            .into_iter()
            .find(|s| s.name == "create_organization_network")
            .unwrap();
        let declared: Vec<String> = spec.params.iter().map(|p| p.name.clone()).collect();

        let schema = EndpointTool::new(spec).schema();
        let exposed: Vec<String> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();

        assert_eq!(declared.first().map(String::as_str), Some("organization_id"));
        assert_eq!(exposed, declared);
        assert_eq!(schema["required"], json!(["organization_id", "name", "product_types"]));
    }

    #[test]
    fn test_destructive_schema_adds_confirmation() {
        let tool = tool("delete_network");
        assert!(tool.schema()["properties"][CONFIRMED_ARG].is_object());
        assert!(tool.description().contains("confirmed: true"));
        assert_eq!(tool.category(), Some(Category::Organizations));
    }

    #[test]
    fn test_build_get_request() {
        let request = tool("get_organization_devices")
            .build_request(&args(json!({
                "organization_id": "123",
                "per_page": "50",
                "serials": "Q2AA-0001, Q2AA-0002",
                "model": "MR46"
            })))
            .unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/organizations/123/devices");
        assert_eq!(request.query_value("perPage"), Some("50"));
        assert_eq!(request.query_value("model"), Some("MR46"));
        let serials: Vec<&str> = request
            .query
            .iter()
            .filter(|(k, _)| k == "serials[]")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(serials, vec!["Q2AA-0001", "Q2AA-0002"]);
        assert_eq!(request.body, None);
        assert_eq!(request.max_pages, 1);
        assert_eq!(request.rate_limit_key, "organization:123");
    }

    #[test]
    fn test_build_put_request_with_defaults() {
        let request = tool("update_device")
            .build_request(&args(json!({
                "serial": "Q2AA-0001",
                "name": "Lobby AP",
                "tags": ["floor1", "lobby"],
                "lat": "37.41"
            })))
            .unwrap();

        assert_eq!(request.path, "/devices/Q2AA-0001");
        assert_eq!(
            request.body,
            Some(json!({
                "name": "Lobby AP",
                "tags": ["floor1", "lobby"],
                "lat": 37.41,
                "moveMapMarker": false
            }))
        );
        assert!(request.query.is_empty());
        assert_eq!(request.rate_limit_key, "device:Q2AA-0001");
    }

    #[test]
    fn test_missing_required_argument() {
        let err = tool("update_device")
            .build_request(&args(json!({ "name": "x" })))
            .unwrap_err();
        assert!(
            matches!(err, MerakiMcpError::InvalidArguments { ref message, .. } if message.contains("'serial'"))
        );
    }

    #[test]
    fn test_unconvertible_argument() {
        let err = tool("get_organization_devices")
            .build_request(&args(json!({ "organization_id": "1", "per_page": "many" })))
            .unwrap_err();
        assert!(
            matches!(err, MerakiMcpError::InvalidArguments { ref message, .. } if message.contains("per_page"))
        );
    }

    #[test]
    fn test_total_pages() {
        let tool = tool("get_organization_devices");
        let all = tool
            .build_request(&args(json!({ "organization_id": "1", "total_pages": -1 })))
            .unwrap();
        assert_eq!(all.max_pages, 0);

        let all_text = tool
            .build_request(&args(json!({ "organization_id": "1", "total_pages": "all" })))
            .unwrap();
        assert_eq!(all_text.max_pages, 0);

        let three = tool
            .build_request(&args(json!({ "organization_id": "1", "total_pages": "3" })))
            .unwrap();
        assert_eq!(three.max_pages, 3);

        assert!(tool
            .build_request(&args(json!({ "organization_id": "1", "total_pages": 0 })))
            .is_err());
    }

    #[test]
    fn test_path_values_are_encoded() {
        let request = tool("delete_network")
            .build_request(&args(json!({ "network_id": "L_1/2" })))
            .unwrap();
        assert_eq!(request.path, "/networks/L_1%2F2");
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_execute_success() {
        let api = Arc::new(MockDashboardApi::returning(json!([
            {"serial": "Q2AA-0001", "model": "MR46"}
        ])));
        let ctx = context(api.clone(), ToolPolicy::default());

        let result = tool("get_organization_devices")
            .execute(args(json!({ "organization_id": "123" })), &ctx)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        let text = first_text(&result).unwrap();
        assert!(text.starts_with("# get_organization_devices"));
        assert!(text.contains("Q2AA-0001"));
        assert_eq!(api.call_count(), 1);
        assert_eq!(api.calls()[0].path, "/organizations/123/devices");
    }

    #[tokio::test]
    async fn test_vendor_failure_is_in_band() {
        let api = Arc::new(MockDashboardApi::failing(404, "Not found"));
        let ctx = context(api, ToolPolicy::default());

        let result = tool("get_organization_devices")
            .execute(args(json!({ "organization_id": "123" })), &ctx)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(first_text(&result).unwrap().starts_with(FAILURE_MARKER));
    }

    #[tokio::test]
    async fn test_destructive_needs_confirmation() {
        let api = Arc::new(MockDashboardApi::returning(Value::Null));
        let ctx = context(api.clone(), ToolPolicy::default());
        let tool = tool("delete_network");

        let result = tool
            .execute(args(json!({ "network_id": "N_1" })), &ctx)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        let text = first_text(&result).unwrap();
        assert!(text.starts_with(CONFIRMATION_MARKER));
        assert!(text.contains("DELETE /networks/N_1"));
        assert_eq!(api.call_count(), 0);

        let result = tool
            .execute(args(json!({ "network_id": "N_1", "confirmed": "true" })), &ctx)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_confirmation_can_be_disabled() {
        let api = Arc::new(MockDashboardApi::returning(Value::Null));
        let policy = ToolPolicy {
            require_confirmations: false,
            ..ToolPolicy::default()
        };
        let ctx = context(api.clone(), policy);

        let result = tool("delete_network")
            .execute(args(json!({ "network_id": "N_1" })), &ctx)
            .await
            .unwrap();
        assert!(first_text(&result).unwrap().contains("No data returned."));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_read_only_mode_blocks_writes() {
        let api = Arc::new(MockDashboardApi::returning(json!({})));
        let policy = ToolPolicy {
            read_only_mode: true,
            ..ToolPolicy::default()
        };
        let ctx = context(api.clone(), policy);

        for (name, arguments) in [
            ("update_device", json!({ "serial": "Q2AA-0001" })),
            ("delete_network", json!({ "network_id": "N_1", "confirmed": true })),
        ] {
            let result = tool(name).execute(args(arguments), &ctx).await.unwrap();
            assert_eq!(result.is_error, Some(true));
            assert!(first_text(&result).unwrap().contains("read-only mode"));
        }
        assert_eq!(api.call_count(), 0);

        let result = tool("get_organization_devices")
            .execute(args(json!({ "organization_id": "1" })), &ctx)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_timeout() {
        let api = Arc::new(MockDashboardApi::returning(json!([])).with_delay(Duration::from_secs(5)));
        let policy = ToolPolicy {
            timeout: Duration::from_millis(20),
            ..ToolPolicy::default()
        };
        let ctx = context(api, policy);

        let err = tool("get_organization_devices")
            .invoke(&args(json!({ "organization_id": "1" })), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, MerakiMcpError::Timeout { .. }));
    }

    #[test]
    fn test_hand_built_spec() {
        let spec = EndpointSpec {
            name: "get_device".to_string(),
            description: "Return a single device".to_string(),
            category: Category::Devices,
            method: HttpMethod::Get,
            path: "/devices/{serial}".to_string(),
            params: vec![ParamSpec {
                name: "serial".to_string(),
                api: "serial".to_string(),
                location: ParamLocation::Path,
                param_type: ParamType::String,
                required: true,
                description: "Device serial number".to_string(),
                default: None,
            }],
            safety: Safety::Read,
            paginated: false,
        };
        let tool = EndpointTool::new(spec);
        assert_eq!(tool.description(), "Return a single device");
        assert!(tool.schema()["properties"].get(TOTAL_PAGES_ARG).is_none());

        let request = tool.build_request(&args(json!({ "serial": 42 }))).unwrap();
        assert_eq!(request.path, "/devices/42");
    }
}
