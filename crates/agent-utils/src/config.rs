//! Configuration management utilities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Application identity shared by the binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "property-research".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Read `APP_ENV`, falling back to `development`
    pub fn from_env() -> Self {
        Self {
            environment: env_string("APP_ENV").unwrap_or_else(|| "development".to_string()),
            ..Self::default()
        }
    }
}

/// Non-empty, trimmed value of an environment variable
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, using `default` when unset or unparsable
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env_string(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment value");
            default
        }),
        None => default,
    }
}

/// Read a boolean flag, accepting `true/false`, `1/0`, `yes/no`, `on/off`
pub fn env_flag(key: &str, default: bool) -> bool {
    env_string(key).map_or(default, |raw| parse_flag(&raw).unwrap_or(default))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_env_or_missing_uses_default() {
        assert_eq!(env_or("AGENT_UTILS_TEST_SURELY_UNSET", 7_u64), 7);
        assert!(env_flag("AGENT_UTILS_TEST_SURELY_UNSET", true));
        assert!(env_string("AGENT_UTILS_TEST_SURELY_UNSET").is_none());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "property-research");
        assert_eq!(config.environment, "development");
    }
}
