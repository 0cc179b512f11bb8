//! Check implementations for the doctor module

use super::types::*;
use crate::tools_cmd::check_catalog;
use meraki_mcp::{ApiRequest, Config, DashboardApi, HttpDashboardClient, MerakiMcpError};

/// Check names constants to avoid typos and improve maintainability
pub mod check_names {
    pub const CONFIG_FILE: &str = "Configuration file";
    pub const CONFIG_VALID: &str = "Configuration values";
    pub const API_KEY: &str = "Dashboard API key";
    pub const CONNECTIVITY: &str = "Dashboard connectivity";
    pub const TOOL_CATALOG: &str = "Tool catalog";
}

/// Report which `meraki-mcp.yaml`, if any, is in effect
pub fn check_config_file(checks: &mut Vec<Check>) {
    match Config::find_yaml_config_file() {
        Some(path) => checks.push(Check::new(
            check_names::CONFIG_FILE,
            CheckStatus::Ok,
            format!("Using {}", path.display()),
        )),
        None => checks.push(Check::new(
            check_names::CONFIG_FILE,
            CheckStatus::Ok,
            "No meraki-mcp.yaml found, using environment variables and defaults",
        )),
    }
}

/// Load and validate the configuration
///
/// Returns the configuration when it loaded and validated.
pub fn check_config_validity(checks: &mut Vec<Check>) -> Option<Config> {
    let config = match Config::load_unvalidated() {
        Ok(config) => config,
        Err(e) => {
            checks.push(
                Check::new(check_names::CONFIG_VALID, CheckStatus::Error, e.to_string())
                    .with_fix("Fix meraki-mcp.yaml or the MERAKI_* environment variables"),
            );
            return None;
        }
    };

    match config.validate() {
        Ok(()) => {
            checks.push(Check::new(
                check_names::CONFIG_VALID,
                CheckStatus::Ok,
                format!(
                    "base_url {}, read-only {}, confirmations {}",
                    config.base_url, config.read_only_mode, config.require_confirmations
                ),
            ));
            Some(config)
        }
        Err(e) => {
            checks.push(
                Check::new(check_names::CONFIG_VALID, CheckStatus::Error, e.to_string())
                    .with_fix("Fix meraki-mcp.yaml or the MERAKI_* environment variables"),
            );
            None
        }
    }
}

/// Show only the last four characters of a key
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// Verify an API key is configured
pub fn check_api_key(checks: &mut Vec<Check>, config: &Config) {
    match config.require_api_key() {
        Ok(key) => checks.push(Check::new(
            check_names::API_KEY,
            CheckStatus::Ok,
            format!("Configured ({})", mask_api_key(key)),
        )),
        Err(e) => checks.push(
            Check::new(check_names::API_KEY, CheckStatus::Error, e.to_string())
                .with_fix("export MERAKI_API_KEY=<key> or set api_key in meraki-mcp.yaml"),
        ),
    }
}

/// GET `/organizations` with the configured key
pub async fn check_connectivity(checks: &mut Vec<Check>, config: &Config) {
    let Ok(api_key) = config.require_api_key() else {
        checks.push(Check::new(
            check_names::CONNECTIVITY,
            CheckStatus::Warning,
            "Skipped, no API key configured",
        ));
        return;
    };

    // One attempt only; retries would just delay the report
    let client = match HttpDashboardClient::new(
        &config.base_url,
        api_key,
        config.timeout(),
        0,
        config.rate_limit_per_second,
    ) {
        Ok(client) => client,
        Err(e) => {
            checks.push(Check::new(
                check_names::CONNECTIVITY,
                CheckStatus::Error,
                format!("Could not build HTTP client: {e}"),
            ));
            return;
        }
    };

    match client.call(ApiRequest::get("/organizations")).await {
        Ok(value) => {
            let count = value.as_array().map(|orgs| orgs.len()).unwrap_or(0);
            checks.push(Check::new(
                check_names::CONNECTIVITY,
                CheckStatus::Ok,
                format!(
                    "Reached {}, {} organization(s) visible",
                    client.base_url(),
                    count
                ),
            ));
        }
        Err(MerakiMcpError::Api { status: 401, .. }) => checks.push(
            Check::new(
                check_names::CONNECTIVITY,
                CheckStatus::Error,
                "The Dashboard rejected the API key (HTTP 401)",
            )
            .with_fix("Generate a new key under My Profile > API access in the Dashboard"),
        ),
        Err(e) => checks.push(
            Check::new(check_names::CONNECTIVITY, CheckStatus::Error, e.to_string())
                .with_fix(format!("Check network access to {}", config.base_url)),
        ),
    }
}

/// Register the full catalog to verify tool names
pub fn check_tool_catalog(checks: &mut Vec<Check>) {
    match check_catalog() {
        Ok(summary) => checks.push(Check::new(
            check_names::TOOL_CATALOG,
            CheckStatus::Ok,
            format!(
                "{} tools across {} categories",
                summary.total,
                summary.per_category.len()
            ),
        )),
        Err(e) => checks.push(Check::new(
            check_names::TOOL_CATALOG,
            CheckStatus::Error,
            e.to_string(),
        )),
    }
}
