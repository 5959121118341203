//! Harness configuration loaded from environment variables
//!
//! Variables may also come from a `.env` file in the working directory.
//!
//! | Variable               | Default                          |
//! |------------------------|----------------------------------|
//! | `PETSTORE_BASE_URL`    | `https://petstore.swagger.io/v2` |
//! | `PETSTORE_TRAFFIC_LOG` | `body`                           |
//! | `PETSTORE_LOG_JSON`    | `false`                          |

use std::env;
use std::str::FromStr;

use crate::transport::{DEFAULT_BASE_URL, TrafficLevel};

pub const BASE_URL_VAR: &str = "PETSTORE_BASE_URL";
pub const TRAFFIC_LOG_VAR: &str = "PETSTORE_TRAFFIC_LOG";
pub const LOG_JSON_VAR: &str = "PETSTORE_LOG_JSON";

/// Load environment variables from `.env` files if it exists.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Get a required environment variable.
pub fn get_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key.to_string()))
}

/// Get an optional environment with a default value
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable.
pub fn get_env_parsed<T: FromStr>(key: &str) -> Result<T, ConfigError> {
    let value = get_env(key)?;
    value.parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value,
    })
}

/// Parse an environment variable when set, falling back to `default` when unset.
///
/// Unlike a silent fallback, a set-but-unparsable value is an error.
pub fn get_env_parsed_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match get_env_parsed(key) {
        Err(ConfigError::Missing(_)) => Ok(default),
        other => other,
    }
}

/// Construction-time parameters of the service wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Base URL of the deployment under test, without a trailing slash.
    pub base_url: String,
    /// Verbosity of the HTTP traffic log.
    pub traffic: TrafficLevel,
    /// Emit logs as JSON.
    pub json_logs: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            traffic: TrafficLevel::Body,
            json_logs: false,
        }
    }
}

impl HarnessConfig {
    /// Reads the `PETSTORE_*` variables, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_current_env()
    }

    /// Reads the `PETSTORE_*` variables without touching `.env`.
    pub fn from_current_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url = get_env_or(BASE_URL_VAR, &defaults.base_url)
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(ConfigError::Invalid {
                key: BASE_URL_VAR.to_string(),
                value: base_url,
            });
        }

        Ok(Self {
            base_url,
            traffic: get_env_parsed_or(TRAFFIC_LOG_VAR, defaults.traffic)?,
            json_logs: get_env_parsed_or(LOG_JSON_VAR, defaults.json_logs)?,
        })
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn traffic(mut self, traffic: TrafficLevel) -> Self {
        self.traffic = traffic;
        self
    }

    pub fn json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Environment variable is not set.
    Missing(String),
    /// Environment variable value is invalid.
    Invalid { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => {
                write!(f, "Missing required environment variable '{}'", key)
            }
            ConfigError::Invalid { key, value } => {
                write!(
                    f,
                    "Invalid value '{}' for environment variable '{}' (failed to parse as expected type)",
                    value, key
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        // SAFETY: every test touching these variables is `#[serial]`.
        unsafe {
            env::remove_var(BASE_URL_VAR);
            env::remove_var(TRAFFIC_LOG_VAR);
            env::remove_var(LOG_JSON_VAR);
        }
    }

    #[test]
    fn test_get_env_missing() {
        let result = get_env("PETSTORE_TEST_MISSING_VAR_12345");
        assert!(result.is_err());
    }

    #[test]
    fn test_get_env_or_default() {
        let value = get_env_or("PETSTORE_TEST_MISSING_VAR_12345", "default");
        assert_eq!(value, "default");
    }

    #[test]
    fn test_get_env_parsed_or_default() {
        let value: u16 = get_env_parsed_or("PETSTORE_TEST_MISSING_VAR_12345", 3000).unwrap();
        assert_eq!(value, 3000);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Missing("PETSTORE_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required environment variable 'PETSTORE_BASE_URL'"
        );

        let err = ConfigError::Invalid {
            key: "PETSTORE_TRAFFIC_LOG".to_string(),
            value: "loud".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'loud' for environment variable 'PETSTORE_TRAFFIC_LOG' (failed to parse as expected type)"
        );
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear();
        let config = HarnessConfig::from_current_env().unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.base_url, "https://petstore.swagger.io/v2");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear();
        unsafe {
            env::set_var(BASE_URL_VAR, "http://localhost:8080/api/v3/");
            env::set_var(TRAFFIC_LOG_VAR, "basic");
            env::set_var(LOG_JSON_VAR, "true");
        }

        let config = HarnessConfig::from_current_env().unwrap();
        clear();

        assert_eq!(config.base_url, "http://localhost:8080/api/v3");
        assert_eq!(config.traffic, TrafficLevel::Basic);
        assert!(config.json_logs);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_traffic_level() {
        clear();
        unsafe {
            env::set_var(TRAFFIC_LOG_VAR, "loud");
        }

        let result = HarnessConfig::from_current_env();
        clear();

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { ref key, .. }) if key == TRAFFIC_LOG_VAR
        ));
    }

    #[test]
    fn test_builder_setters() {
        let config = HarnessConfig::default()
            .base_url("http://127.0.0.1:1234/v2/")
            .traffic(TrafficLevel::None)
            .json_logs(true);
        assert_eq!(config.base_url, "http://127.0.0.1:1234/v2");
        assert_eq!(config.traffic, TrafficLevel::None);
        assert!(config.json_logs);
    }
}
