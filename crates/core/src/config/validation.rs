//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `api_key_env` is empty
    /// - `api_key` is set but blank
    /// - `base_url` is not an http(s) URL
    /// - `extra_params.limit` is not a whole number between 1 and 100
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.api_key_env.is_empty() {
            return Err(ConfigError::Invalid { field: "api_key_env".into(), reason: "must not be empty".into() });
        }

        if let Some(key) = &self.api_key
            && key.trim().is_empty()
        {
            return Err(ConfigError::Invalid {
                field: "api_key".into(),
                reason: "must not be blank; unset it to read the key from the environment".into(),
            });
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "base_url".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "base_url".into(), reason: e.to_string() });
            }
        }

        if let Some(limit) = self.extra_params.get("limit") {
            validate_limit(limit)?;
        }

        if self.extra_params.contains_key("q") {
            tracing::warn!("extra_params contains `q`; it is ignored in favor of the request query");
        }

        Ok(())
    }
}

/// Check a configured `limit`: a whole number (or numeric string) in 1..=100.
fn validate_limit(value: &serde_json::Value) -> Result<(), ConfigError> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.fract() == 0.0 && (1.0..=100.0).contains(&n) => Ok(()),
        _ => Err(ConfigError::Invalid {
            field: "extra_params.limit".into(),
            reason: format!("must be a whole number between 1 and 100, got {}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_blank_api_key() {
        let config = AppConfig { api_key: Some("  ".into()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_key"));
    }

    #[test]
    fn test_validate_base_url() {
        let config = AppConfig { base_url: "ftp://kagi.com".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "base_url"));

        let config = AppConfig { base_url: "kagi".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "base_url"));

        let config = AppConfig { base_url: "http://127.0.0.1:8080".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_extra_limit() {
        let mut config = AppConfig::default();
        config.extra_params.insert("limit".into(), "500".into());
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "extra_params.limit"));

        config.extra_params.insert("limit".into(), serde_json::json!(2.5));
        assert!(config.validate().is_err());

        config.extra_params.insert("limit".into(), serde_json::json!(true));
        assert!(config.validate().is_err());

        config.extra_params.insert("limit".into(), serde_json::json!(20));
        assert!(config.validate().is_ok());

        config.extra_params.insert("limit".into(), "100".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
