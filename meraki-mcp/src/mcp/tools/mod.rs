//! Registration of Dashboard API tools by category
//!
//! Each category's catalog document becomes one [`EndpointTool`] per
//! endpoint. The `register_<category>_tools` functions are called in
//! [`Category::ALL`] order by [`register_all_tools`].

use crate::catalog::{load_category, Category};
use crate::error::Result;
use crate::mcp::endpoint_tool::EndpointTool;
use crate::mcp::tool_registry::{McpTool, ToolRegistry};

/// Register every endpoint of one category, returning how many were added
///
/// A category is registered whole or not at all.
pub fn register_category_tools(registry: &mut ToolRegistry, category: Category) -> Result<usize> {
    let tools: Vec<Box<dyn McpTool>> = load_category(category)?
        .into_iter()
        .map(|spec| Box::new(EndpointTool::new(spec)) as Box<dyn McpTool>)
        .collect();
    let count = registry.register_many(tools)?;
    tracing::debug!("Registered {} {} tools", count, category);
    Ok(count)
}

/// Register organization, admin, inventory and webhook tools
pub fn register_organization_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Organizations).map(|_| ())
}

/// Register network, client and alert tools
pub fn register_network_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Networks).map(|_| ())
}

/// Register device level tools
pub fn register_device_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Devices).map(|_| ())
}

/// Register MR wireless tools
pub fn register_wireless_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Wireless).map(|_| ())
}

/// Register MS switch tools
pub fn register_switch_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Switch).map(|_| ())
}

/// Register MX appliance tools
pub fn register_appliance_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Appliance).map(|_| ())
}

/// Register MV camera tools
pub fn register_camera_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Camera).map(|_| ())
}

/// Register MT sensor tools
pub fn register_sensor_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Sensor).map(|_| ())
}

/// Register MG cellular gateway tools
pub fn register_cellular_gateway_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::CellularGateway).map(|_| ())
}

/// Register Systems Manager tools
pub fn register_systems_manager_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::SystemsManager).map(|_| ())
}

/// Register licensing tools
pub fn register_licensing_tools(registry: &mut ToolRegistry) -> Result<()> {
    register_category_tools(registry, Category::Licensing).map(|_| ())
}

/// Register the tools of the enabled categories in canonical order
///
/// `enabled` filters which categories are registered; its own order does not
/// matter. Any registration error aborts.
pub fn register_all_tools(registry: &mut ToolRegistry, enabled: &[Category]) -> Result<()> {
    let registrars: [(Category, fn(&mut ToolRegistry) -> Result<()>); 11] = [
        (Category::Organizations, register_organization_tools),
        (Category::Networks, register_network_tools),
        (Category::Devices, register_device_tools),
        (Category::Wireless, register_wireless_tools),
        (Category::Switch, register_switch_tools),
        (Category::Appliance, register_appliance_tools),
        (Category::Camera, register_camera_tools),
        (Category::Sensor, register_sensor_tools),
        (Category::CellularGateway, register_cellular_gateway_tools),
        (Category::SystemsManager, register_systems_manager_tools),
        (Category::Licensing, register_licensing_tools),
    ];

    for (category, register) in registrars {
        if enabled.contains(&category) {
            register(registry)?;
        }
    }

    tracing::info!(
        "Registered {} tools across {} categories",
        registry.len(),
        enabled.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MerakiMcpError;
    use crate::mcp::tool_registry::MAX_TOOL_NAME_LENGTH;
    use std::collections::HashSet;

    #[test]
    fn test_register_all_categories() {
        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry, &Category::ALL).unwrap();

        let summary = registry.summary();
        for category in Category::ALL {
            assert!(summary.count(category) > 0, "{category} has no tools");
        }
        assert_eq!(summary.uncategorized, 0);
        assert_eq!(summary.total, registry.len());
        assert!(summary.longest_name.len() <= MAX_TOOL_NAME_LENGTH);

        let names = registry.list_tool_names();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(registry.contains("get_organizations"));
        assert!(registry.contains("delete_organization_webhook"));
    }

    #[test]
    fn test_registration_follows_category_order() {
        let mut registry = ToolRegistry::new();
        // Order of the allow-list is irrelevant
        register_all_tools(&mut registry, &[Category::Licensing, Category::Organizations]).unwrap();

        let categories: Vec<Category> = registry.iter().filter_map(|t| t.category()).collect();
        let first_licensing = categories
            .iter()
            .position(|c| *c == Category::Licensing)
            .unwrap();
        assert!(categories[..first_licensing]
            .iter()
            .all(|c| *c == Category::Organizations));
        assert!(categories[first_licensing..]
            .iter()
            .all(|c| *c == Category::Licensing));
    }

    #[test]
    fn test_registering_a_category_twice_fails() {
        let mut registry = ToolRegistry::new();
        register_sensor_tools(&mut registry).unwrap();
        let before = registry.len();

        let err = register_sensor_tools(&mut registry).unwrap_err();
        assert!(matches!(err, MerakiMcpError::DuplicateToolName(_)));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_clash_late_in_category_registers_nothing() {
        let mut registry = ToolRegistry::new();
        let last = load_category(Category::Devices).unwrap().pop().unwrap();
        let clashing = last.name.clone();
        registry.register(EndpointTool::new(last)).unwrap();

        let err = register_device_tools(&mut registry).unwrap_err();
        assert!(matches!(err, MerakiMcpError::DuplicateToolName(ref n) if *n == clashing));
        assert_eq!(registry.list_tool_names(), vec![clashing]);
    }

    #[test]
    fn test_empty_allow_list() {
        let mut registry = ToolRegistry::new();
        register_all_tools(&mut registry, &[]).unwrap();
        assert!(registry.is_empty());
    }
}
