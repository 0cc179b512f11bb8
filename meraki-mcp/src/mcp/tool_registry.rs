//! Tool registry for MCP operations
//!
//! Tools are registered once at startup and listed in registration order.
//! Registration enforces the naming rules MCP clients rely on: names are
//! unique, at most [`MAX_TOOL_NAME_LENGTH`] characters and limited to
//! `[A-Za-z0-9_-]`.

use crate::catalog::Category;
use crate::client::DashboardApi;
use crate::config::Config;
use crate::error::{MerakiMcpError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rmcp::model::{CallToolResult, Tool};
use rmcp::Error as McpError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Longest tool name accepted by common MCP clients
pub const MAX_TOOL_NAME_LENGTH: usize = 64;

static TOOL_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Failed to compile tool name regex"));

/// Check a tool name against the length and character rules
pub fn validate_tool_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MerakiMcpError::InvalidToolName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }

    let length = name.chars().count();
    if length > MAX_TOOL_NAME_LENGTH {
        return Err(MerakiMcpError::ToolNameTooLong {
            name: name.to_string(),
            length,
        });
    }

    if !TOOL_NAME_PATTERN.is_match(name) {
        return Err(MerakiMcpError::InvalidToolName {
            name: name.to_string(),
            reason: "only letters, digits, '_' and '-' are allowed".to_string(),
        });
    }

    Ok(())
}

/// Behaviour switches applied to every tool invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPolicy {
    /// Refuse tools that modify Dashboard state
    pub read_only_mode: bool,
    /// Destructive tools need `confirmed: true`
    pub require_confirmations: bool,
    /// Upper bound on a single Dashboard call
    pub timeout: Duration,
    /// Number of list entries shown in a response
    pub preview_items: usize,
}

impl Default for ToolPolicy {
    fn default() -> Self {
        Self {
            read_only_mode: false,
            require_confirmations: true,
            timeout: Duration::from_secs(60),
            preview_items: 10,
        }
    }
}

impl ToolPolicy {
    /// Build the policy from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            read_only_mode: config.read_only_mode,
            require_confirmations: config.require_confirmations,
            timeout: config.timeout(),
            preview_items: config.preview_items,
        }
    }
}

/// Context shared by all tools during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Dashboard API used by every tool
    pub api: Arc<dyn DashboardApi>,
    /// Invocation policy
    pub policy: ToolPolicy,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(api: Arc<dyn DashboardApi>, policy: ToolPolicy) -> Self {
        Self { api, policy }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// API category the tool belongs to, if any
    fn category(&self) -> Option<Category> {
        None
    }

    /// Execute the tool with the given arguments and context
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn McpTool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool in the registry
    ///
    /// # Errors
    ///
    /// Fails with `ToolNameTooLong`, `InvalidToolName` or `DuplicateToolName`.
    /// An existing registration is never replaced.
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register_boxed(Box::new(tool))
    }

    /// Register an already boxed tool
    pub fn register_boxed(&mut self, tool: Box<dyn McpTool>) -> Result<()> {
        let name = tool.name().to_string();
        validate_tool_name(&name)?;

        if self.index.contains_key(&name) {
            return Err(MerakiMcpError::DuplicateToolName(name));
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register a batch of tools, all or none
    ///
    /// Every name is checked against the rules, the registry and the rest of
    /// the batch before the first tool is inserted. Returns the number added.
    pub fn register_many(&mut self, tools: Vec<Box<dyn McpTool>>) -> Result<usize> {
        let mut seen = HashSet::new();
        for tool in &tools {
            let name = tool.name();
            validate_tool_name(name)?;
            if self.index.contains_key(name) || !seen.insert(name) {
                return Err(MerakiMcpError::DuplicateToolName(name.to_string()));
            }
        }

        let count = tools.len();
        for tool in tools {
            self.index.insert(tool.name().to_string(), self.tools.len());
            self.tools.push(tool);
        }
        Ok(count)
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// Get a tool by name, failing with `UnknownTool`
    pub fn resolve(&self, name: &str) -> Result<&dyn McpTool> {
        self.get_tool(name)
            .ok_or_else(|| MerakiMcpError::UnknownTool(name.to_string()))
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List all registered tool names in registration order
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name().to_string()).collect()
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| {
                let schema = tool.schema();
                let schema_map = if let serde_json::Value::Object(map) = schema {
                    map
                } else {
                    serde_json::Map::new()
                };

                Tool {
                    name: tool.name().to_string().into(),
                    description: Some(tool.description().to_string().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect()
    }

    /// Iterate over the registered tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn McpTool> {
        self.tools.iter().map(|tool| tool.as_ref())
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Per-category counts and the longest registered name
    pub fn summary(&self) -> RegistrySummary {
        let mut per_category: BTreeMap<Category, usize> = BTreeMap::new();
        let mut uncategorized = 0;
        let mut longest_name = String::new();

        for tool in &self.tools {
            match tool.category() {
                Some(category) => *per_category.entry(category).or_default() += 1,
                None => uncategorized += 1,
            }
            if tool.name().chars().count() > longest_name.chars().count() {
                longest_name = tool.name().to_string();
            }
        }

        RegistrySummary {
            per_category: per_category.into_iter().collect(),
            uncategorized,
            longest_name,
            total: self.tools.len(),
        }
    }
}

/// Aggregate view of a populated registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySummary {
    /// Tool count per category, in category order
    pub per_category: Vec<(Category, usize)>,
    /// Tools registered without a category
    pub uncategorized: usize,
    /// Longest tool name, empty for an empty registry
    pub longest_name: String,
    /// Total number of tools
    pub total: usize,
}

impl RegistrySummary {
    /// Number of tools registered for a category
    pub fn count(&self, category: Category) -> usize {
        self.per_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockDashboardApi;
    use crate::mcp::responses::create_success_response;
    use proptest::prelude::*;
    use rmcp::model::RawContent;
    use serde_json::json;

    /// Mock tool for testing
    struct MockTool {
        name: String,
        description: &'static str,
        category: Option<Category>,
    }

    impl MockTool {
        fn named(name: &str) -> Self {
            Self {
                name: name.to_string(),
                description: "A test tool",
                category: None,
            }
        }

        fn in_category(name: &str, category: Category) -> Self {
            Self {
                category: Some(category),
                ..Self::named(name)
            }
        }
    }

    #[async_trait::async_trait]
    impl McpTool for MockTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": {},
                "required": []
            })
        }

        fn category(&self) -> Option<Category> {
            self.category
        }

        async fn execute(
            &self,
            _arguments: serde_json::Map<String, serde_json::Value>,
            _context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            Ok(create_success_response(format!(
                "Mock tool {} executed",
                self.name
            )))
        }
    }

    fn test_context() -> ToolContext {
        ToolContext::new(
            Arc::new(MockDashboardApi::returning(json!(null))),
            ToolPolicy::default(),
        )
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.list_tools().is_empty());
    }

    #[test]
    fn test_tool_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::named("test_tool")).unwrap();

        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
        assert!(registry.get_tool("test_tool").is_some());
        assert!(registry.get_tool("nonexistent").is_none());
        assert!(registry.contains("test_tool"));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::named("get_organizations")).unwrap();

        let err = registry
            .register(MockTool::named("get_organizations"))
            .unwrap_err();
        assert!(matches!(err, MerakiMcpError::DuplicateToolName(ref n) if n == "get_organizations"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_many_is_all_or_nothing() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::named("get_device")).unwrap();

        let batch: Vec<Box<dyn McpTool>> = vec![
            Box::new(MockTool::named("get_devices")),
            Box::new(MockTool::named("update_device")),
            Box::new(MockTool::named("get_device")),
        ];
        let err = registry.register_many(batch).unwrap_err();
        assert!(matches!(err, MerakiMcpError::DuplicateToolName(ref n) if n == "get_device"));
        assert_eq!(registry.list_tool_names(), vec!["get_device".to_string()]);

        let repeated: Vec<Box<dyn McpTool>> = vec![
            Box::new(MockTool::named("reboot_device")),
            Box::new(MockTool::named("reboot_device")),
        ];
        assert!(registry.register_many(repeated).is_err());
        assert_eq!(registry.len(), 1);

        let valid: Vec<Box<dyn McpTool>> = vec![
            Box::new(MockTool::named("get_devices")),
            Box::new(MockTool::named("update_device")),
        ];
        assert_eq!(registry.register_many(valid).unwrap(), 2);
        assert_eq!(
            registry.list_tool_names(),
            vec!["get_device", "get_devices", "update_device"]
        );
    }

    #[test]
    fn test_name_length_limit() {
        let mut registry = ToolRegistry::new();

        let exact = "a".repeat(MAX_TOOL_NAME_LENGTH);
        registry.register(MockTool::named(&exact)).unwrap();

        let too_long = "a".repeat(MAX_TOOL_NAME_LENGTH + 1);
        let err = registry.register(MockTool::named(&too_long)).unwrap_err();
        assert!(matches!(err, MerakiMcpError::ToolNameTooLong { length: 65, .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for bad in ["", "get organizations", "get.organizations", "ünicode"] {
            let err = validate_tool_name(bad).unwrap_err();
            assert!(
                matches!(err, MerakiMcpError::InvalidToolName { .. }),
                "{bad:?} should be invalid"
            );
        }
        assert!(validate_tool_name("get-org_2").is_ok());
    }

    #[test]
    fn test_resolve_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.resolve("get_everything").map(|_| ()).unwrap_err();
        assert!(matches!(err, MerakiMcpError::UnknownTool(ref n) if n == "get_everything"));
    }

    #[test]
    fn test_listing_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        let names = ["zeta", "alpha", "mike", "bravo", "yankee"];
        for name in names {
            registry.register(MockTool::named(name)).unwrap();
        }

        assert_eq!(registry.list_tool_names(), names);
        let listed: Vec<String> = registry
            .list_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn test_list_tools_carries_schema_and_description() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::named("schema_tool")).unwrap();

        let tools = registry.list_tools();
        assert_eq!(tools[0].description.as_deref(), Some("A test tool"));
        assert_eq!(tools[0].input_schema.get("type"), Some(&json!("object")));
    }

    #[test]
    fn test_summary_counts_per_category() {
        let mut registry = ToolRegistry::new();
        registry
            .register(MockTool::in_category("get_organizations", Category::Organizations))
            .unwrap();
        registry
            .register(MockTool::in_category("get_organization", Category::Organizations))
            .unwrap();
        registry
            .register(MockTool::in_category("get_device", Category::Devices))
            .unwrap();
        registry.register(MockTool::named("plain")).unwrap();

        let summary = registry.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count(Category::Organizations), 2);
        assert_eq!(summary.count(Category::Devices), 1);
        assert_eq!(summary.count(Category::Wireless), 0);
        assert_eq!(summary.uncategorized, 1);
        assert_eq!(summary.longest_name, "get_organizations");
    }

    #[tokio::test]
    async fn test_tool_execution() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::named("exec_test")).unwrap();

        let tool = registry.resolve("exec_test").unwrap();
        let result = tool
            .execute(serde_json::Map::new(), &test_context())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert!(matches!(
            &result.content[0].raw,
            RawContent::Text(text) if text.text == "Mock tool exec_test executed"
        ));
    }

    proptest! {
        #[test]
        fn prop_valid_names_accepted(name in "[A-Za-z0-9_-]{1,64}") {
            prop_assert!(validate_tool_name(&name).is_ok());
        }

        #[test]
        fn prop_long_names_rejected(name in "[a-z_]{65,100}") {
            let is_too_long = matches!(
                validate_tool_name(&name),
                Err(MerakiMcpError::ToolNameTooLong { .. })
            );
            prop_assert!(is_too_long);
        }

        #[test]
        fn prop_names_with_spaces_rejected(prefix in "[a-z]{1,20}", suffix in "[a-z]{1,20}") {
            let name = format!("{prefix} {suffix}");
            prop_assert!(validate_tool_name(&name).is_err());
        }
    }
}
