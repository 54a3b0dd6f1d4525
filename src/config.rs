//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The `default_*` fields are the fallbacks used for any node configuration
/// field a deploy request leaves out.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Root directory for file persistence, None = in-memory store
    pub store_dir: Option<PathBuf>,
    /// Retained messages per key when a node does not say otherwise
    pub default_max_entries: usize,
    /// Message field used as cache key when a node does not say otherwise
    pub default_cache_key: String,
    /// Persistence scope name when a node does not say otherwise
    pub default_store_name: String,
    /// Variable name the cache is stored under when a node does not say otherwise
    pub default_var_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_DIR` - File store root directory (default: unset, in-memory)
    /// - `DEFAULT_MAX_ENTRIES` - Retained messages per key (default: 1)
    /// - `DEFAULT_CACHE_KEY` - Cache key field (default: "topic")
    /// - `DEFAULT_STORE_NAME` - Persistence scope (default: "default")
    /// - `DEFAULT_VAR_NAME` - Persistence variable name (default: "uib_cache")
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            store_dir: env::var("STORE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            default_max_entries: env::var("DEFAULT_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_max_entries),
            default_cache_key: non_empty_var("DEFAULT_CACHE_KEY")
                .unwrap_or(defaults.default_cache_key),
            default_store_name: non_empty_var("DEFAULT_STORE_NAME")
                .unwrap_or(defaults.default_store_name),
            default_var_name: non_empty_var("DEFAULT_VAR_NAME")
                .unwrap_or(defaults.default_var_name),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            store_dir: None,
            default_max_entries: 1,
            default_cache_key: "topic".to_string(),
            default_store_name: "default".to_string(),
            default_var_name: "uib_cache".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert!(config.store_dir.is_none());
        assert_eq!(config.default_max_entries, 1);
        assert_eq!(config.default_cache_key, "topic");
        assert_eq!(config.default_store_name, "default");
        assert_eq!(config.default_var_name, "uib_cache");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("STORE_DIR");
        env::remove_var("DEFAULT_MAX_ENTRIES");
        env::remove_var("DEFAULT_CACHE_KEY");
        env::remove_var("DEFAULT_STORE_NAME");
        env::remove_var("DEFAULT_VAR_NAME");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert!(config.store_dir.is_none());
        assert_eq!(config.default_max_entries, 1);
        assert_eq!(config.default_cache_key, "topic");
    }
}
