//! Configuration management for meraki-mcp
//!
//! Settings are resolved from, in increasing precedence: built-in defaults,
//! `MERAKI_*` environment variables, an optional `meraki-mcp.yaml` file and
//! finally command line flags applied by the CLI.

use crate::catalog::Category;
use crate::common::env_loader::EnvLoader;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default Dashboard API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Name of the optional YAML configuration file
pub const CONFIG_FILE_NAME: &str = "meraki-mcp.yaml";

const ENV_PREFIX: &str = "MERAKI";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error that occurred during file reading
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the configuration field that has an invalid value
        field: String,
        /// The invalid value that was provided
        value: String,
        /// Helpful hint about how to fix the issue
        hint: String,
    },

    /// No Dashboard API key was configured
    #[error("No Meraki Dashboard API key configured\nHint: set MERAKI_API_KEY or add 'api_key' to {CONFIG_FILE_NAME}")]
    MissingApiKey,

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    Validation {
        /// Descriptive message about the validation failure
        message: String,
    },
}

/// Configuration settings for the Meraki MCP server
#[derive(Clone)]
pub struct Config {
    /// Dashboard API key (required to serve)
    pub api_key: Option<String>,
    /// Dashboard API base URL
    pub base_url: String,
    /// Refuse every tool that modifies Dashboard state
    pub read_only_mode: bool,
    /// Require `confirmed=true` on destructive tools
    pub require_confirmations: bool,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Retries for 429 and 5xx responses
    pub max_retries: u32,
    /// Client-side request budget per scope
    pub rate_limit_per_second: u32,
    /// List entries previewed in a tool response
    pub preview_items: usize,
    /// Category allow-list, `None` meaning all categories
    pub categories: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            read_only_mode: false,
            require_confirmations: true,
            timeout_secs: 60,
            max_retries: 2,
            rate_limit_per_second: 10,
            preview_items: 10,
            categories: None,
        }
    }
}

// The API key never ends up in logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("read_only_mode", &self.read_only_mode)
            .field("require_confirmations", &self.require_confirmations)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("rate_limit_per_second", &self.rate_limit_per_second)
            .field("preview_items", &self.preview_items)
            .field("categories", &self.categories)
            .finish()
    }
}

impl Config {
    /// Load configuration from defaults, environment and the first YAML
    /// file found by [`Config::find_yaml_config_file`], then validate it
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Same layering as [`Config::load`] without validation
    ///
    /// Callers applying command-line overrides validate afterwards, so a bad
    /// environment value that a flag replaces is never reported.
    pub fn load_unvalidated() -> Result<Self, ConfigError> {
        let mut config = Self::from_env();

        if let Some(path) = Self::find_yaml_config_file() {
            let yaml_config = YamlConfig::load_from_file(&path)?;
            yaml_config.apply_to_config(&mut config);
        }

        tracing::debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Defaults overridden by `MERAKI_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_vars();
        config
    }

    /// Apply environment variable configuration to this config
    pub fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new(ENV_PREFIX);

        if let Some(key) = loader.load_non_empty("API_KEY") {
            self.api_key = Some(key);
        }
        self.base_url = loader.load_string("BASE_URL", &self.base_url);
        if let Some(flag) = loader.load_bool("READ_ONLY_MODE") {
            self.read_only_mode = flag;
        }
        if let Some(flag) = loader.load_bool("REQUIRE_CONFIRMATIONS") {
            self.require_confirmations = flag;
        }
        self.timeout_secs = loader.load_parsed("TIMEOUT_SECS", self.timeout_secs);
        self.max_retries = loader.load_parsed("MAX_RETRIES", self.max_retries);
        self.rate_limit_per_second =
            loader.load_parsed("RATE_LIMIT_PER_SECOND", self.rate_limit_per_second);
        self.preview_items = loader.load_parsed("PREVIEW_ITEMS", self.preview_items);
        if let Some(categories) = loader.load_list("CATEGORIES") {
            self.categories = Some(categories);
        }
    }

    /// Find the meraki-mcp.yaml configuration file
    ///
    /// The search order is:
    /// 1. Current working directory: `meraki-mcp.yaml`
    /// 2. `~/.config/meraki-mcp/meraki-mcp.yaml`
    /// 3. `~/meraki-mcp.yaml`
    pub fn find_yaml_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(
                home_dir
                    .join(".config")
                    .join("meraki-mcp")
                    .join(CONFIG_FILE_NAME),
            );
            search_paths.push(home_dir.join(CONFIG_FILE_NAME));
        }

        Self::find_first_config_file(&search_paths)
    }

    /// First readable file among `candidates`
    pub fn find_first_config_file(candidates: &[PathBuf]) -> Option<PathBuf> {
        for config_path in candidates {
            if let Some(path) = Self::check_config_file(config_path) {
                tracing::debug!("Found configuration file: {:?}", path);
                return Some(path);
            }
        }

        tracing::debug!("No {} configuration file found", CONFIG_FILE_NAME);
        None
    }

    /// Check if a configuration file exists and is readable
    pub fn check_config_file(config_path: &Path) -> Option<PathBuf> {
        match config_path.try_exists() {
            Ok(true) if config_path.is_file() => match std::fs::File::open(config_path) {
                Ok(_) => Some(config_path.to_path_buf()),
                Err(e) => {
                    tracing::warn!(
                        "Configuration file {:?} exists but cannot be read: {}",
                        config_path,
                        e
                    );
                    None
                }
            },
            Ok(false) => None,
            Ok(true) => {
                tracing::debug!("Found {:?} but it is not a file", config_path);
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Error checking for configuration file {:?}: {}",
                    config_path,
                    e
                );
                None
            }
        }
    }

    /// Validate the current configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url".to_string(),
            value: self.base_url.clone(),
            hint: format!("base_url must be an absolute URL ({e})"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                hint: "base_url must use http or https".to_string(),
            });
        }

        Self::require_positive("timeout_secs", self.timeout_secs)?;
        Self::require_positive("rate_limit_per_second", u64::from(self.rate_limit_per_second))?;
        Self::require_positive("preview_items", self.preview_items as u64)?;

        self.enabled_categories()?;
        Ok(())
    }

    fn require_positive(field: &str, value: u64) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                hint: format!("{field} must be greater than zero"),
            });
        }
        Ok(())
    }

    /// The API key, or [`ConfigError::MissingApiKey`]
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Categories to register, in registration order
    pub fn enabled_categories(&self) -> Result<Vec<Category>, ConfigError> {
        let Some(names) = &self.categories else {
            return Ok(Category::ALL.to_vec());
        };

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let category: Category = name.parse().map_err(|e| ConfigError::InvalidValue {
                field: "categories".to_string(),
                value: name.clone(),
                hint: e,
            })?;
            if !selected.contains(&category) {
                selected.push(category);
            }
        }

        if selected.is_empty() {
            return Err(ConfigError::Validation {
                message: "at least one tool category must be enabled".to_string(),
            });
        }

        // Keep the canonical registration order regardless of input order
        selected.sort_by_key(|c| c.position());
        Ok(selected)
    }

    /// Example configuration file contents
    pub fn example_yaml_config() -> &'static str {
        r#"# meraki-mcp.yaml
api_key: "your-dashboard-api-key"
base_url: "https://api.meraki.com/api/v1"
read_only_mode: false
require_confirmations: true
timeout_secs: 60
max_retries: 2
rate_limit_per_second: 10
preview_items: 10
# categories: [organizations, networks, devices]
"#
    }
}

/// Settings read from `meraki-mcp.yaml`; unset fields leave the config as is
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// Dashboard API key
    pub api_key: Option<String>,
    /// Dashboard API base URL
    pub base_url: Option<String>,
    /// Refuse mutating tools
    pub read_only_mode: Option<bool>,
    /// Require confirmation for destructive tools
    pub require_confirmations: Option<bool>,
    /// Per-call timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Retries for 429 and 5xx responses
    pub max_retries: Option<u32>,
    /// Client-side request budget
    pub rate_limit_per_second: Option<u32>,
    /// List entries previewed in a tool response
    pub preview_items: Option<usize>,
    /// Category allow-list
    pub categories: Option<Vec<String>>,
}

impl YamlConfig {
    /// Apply the values present in this file to `config`
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(api_key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            config.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(flag) = self.read_only_mode {
            config.read_only_mode = flag;
        }
        if let Some(flag) = self.require_confirmations {
            config.require_confirmations = flag;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(rate) = self.rate_limit_per_second {
            config.rate_limit_per_second = rate;
        }
        if let Some(items) = self.preview_items {
            config.preview_items = items;
        }
        if let Some(categories) = &self.categories {
            config.categories = Some(categories.clone());
        }
    }

    /// Load and parse a YAML configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
