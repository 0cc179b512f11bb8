//! Declarative Dashboard API endpoint catalog
//!
//! Each API category is described by a YAML document embedded in the
//! binary. A document lists endpoints with their HTTP method, path template
//! and arguments; [`loader`] turns it into validated [`EndpointSpec`]s that
//! the generic endpoint tool interprets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// YAML document parsing and validation
pub mod loader;
/// Catalog entry types
pub mod spec;

pub use loader::{load_category, parse_catalog};
pub use spec::{EndpointSpec, ParamLocation, ParamSpec, ParamType, Safety};

/// Dashboard API category, one YAML document each
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Organizations, admins, inventory, webhooks
    Organizations,
    /// Networks, clients, events, alerts
    Networks,
    /// Device level operations
    Devices,
    /// MR access points and SSIDs
    Wireless,
    /// MS switches
    Switch,
    /// MX security appliances
    Appliance,
    /// MV cameras
    Camera,
    /// MT sensors
    Sensor,
    /// MG cellular gateways
    CellularGateway,
    /// Systems Manager (MDM)
    SystemsManager,
    /// Licensing
    Licensing,
}

impl Category {
    /// Every category in registration order
    pub const ALL: [Category; 11] = [
        Category::Organizations,
        Category::Networks,
        Category::Devices,
        Category::Wireless,
        Category::Switch,
        Category::Appliance,
        Category::Camera,
        Category::Sensor,
        Category::CellularGateway,
        Category::SystemsManager,
        Category::Licensing,
    ];

    /// snake_case name
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Organizations => "organizations",
            Category::Networks => "networks",
            Category::Devices => "devices",
            Category::Wireless => "wireless",
            Category::Switch => "switch",
            Category::Appliance => "appliance",
            Category::Camera => "camera",
            Category::Sensor => "sensor",
            Category::CellularGateway => "cellular_gateway",
            Category::SystemsManager => "systems_manager",
            Category::Licensing => "licensing",
        }
    }

    /// Index in [`Category::ALL`]
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(usize::MAX)
    }

    /// Embedded YAML document for this category
    pub fn source(self) -> &'static str {
        match self {
            Category::Organizations => include_str!("data/organizations.yaml"),
            Category::Networks => include_str!("data/networks.yaml"),
            Category::Devices => include_str!("data/devices.yaml"),
            Category::Wireless => include_str!("data/wireless.yaml"),
            Category::Switch => include_str!("data/switch.yaml"),
            Category::Appliance => include_str!("data/appliance.yaml"),
            Category::Camera => include_str!("data/camera.yaml"),
            Category::Sensor => include_str!("data/sensor.yaml"),
            Category::CellularGateway => include_str!("data/cellular_gateway.yaml"),
            Category::SystemsManager => include_str!("data/systems_manager.yaml"),
            Category::Licensing => include_str!("data/licensing.yaml"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "unknown category '{}', expected one of: {}",
                    s.trim(),
                    valid.join(", ")
                )
            })
    }
}
