//! Request DTOs for the replay cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{ContextLevel, NodeConfig};
use crate::config::Config;

/// Request body for deploying a node (PUT /nodes/:name)
///
/// Every field is optional; missing fields fall back to the server defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeployRequest {
    /// Message field used as cache key
    #[serde(default)]
    pub cache_key_field: Option<String>,
    /// Keep every message in one bucket
    #[serde(default)]
    pub cache_all_mode: Option<bool>,
    /// Messages retained per key, 0 = unlimited
    #[serde(default)]
    pub max_entries: Option<usize>,
    /// Persistence scope name
    #[serde(default)]
    pub persistence_scope_name: Option<String>,
    /// Sharing level of the persisted cache
    #[serde(default)]
    pub context_level: Option<ContextLevel>,
    /// Variable name the cache is stored under
    #[serde(default)]
    pub var_name: Option<String>,
}

impl DeployRequest {
    /// Builds the node configuration for `name`, filling gaps from `defaults`.
    pub fn into_config(self, name: impl Into<String>, defaults: &Config) -> NodeConfig {
        NodeConfig {
            name: name.into(),
            cache_key_field: self
                .cache_key_field
                .unwrap_or_else(|| defaults.default_cache_key.clone()),
            cache_all: self.cache_all_mode.unwrap_or(false),
            max_entries: self.max_entries.unwrap_or(defaults.default_max_entries),
            store_name: self
                .persistence_scope_name
                .unwrap_or_else(|| defaults.default_store_name.clone()),
            context_level: self.context_level.unwrap_or_default(),
            var_name: self
                .var_name
                .unwrap_or_else(|| defaults.default_var_name.clone()),
        }
    }
}
