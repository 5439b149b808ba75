//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_KAGI_*)
//! 2. TOML config file (if MCP_KAGI_CONFIG_FILE set)
//! 3. Built-in defaults

use std::collections::BTreeMap;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_KAGI_*)
/// 2. TOML config file (if MCP_KAGI_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Explicit Kagi API key. Takes precedence over `api_key_env`.
    ///
    /// Set via MCP_KAGI_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the Kagi API key.
    ///
    /// Set via MCP_KAGI_API_KEY_ENV environment variable.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the Kagi API.
    ///
    /// Set via MCP_KAGI_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_KAGI_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MCP_KAGI_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Parameters added to every search request.
    ///
    /// Set via `[extra_params]` in the config file or
    /// MCP_KAGI_EXTRA_PARAMS__<NAME> environment variables. Values keep their
    /// type (string, number, boolean) and are stringified per request.
    #[serde(default)]
    pub extra_params: BTreeMap<String, serde_json::Value>,
}

fn default_api_key_env() -> String {
    "KAGI_API_KEY".into()
}

fn default_base_url() -> String {
    "https://kagi.com/api/v0".into()
}

fn default_user_agent() -> String {
    "mcp-kagi/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            extra_params: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_KAGI_`
    /// 2. TOML file from `MCP_KAGI_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_KAGI_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_KAGI_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Extra parameters as JSON values, ready for the search client.
    pub fn extra_params_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.extra_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
