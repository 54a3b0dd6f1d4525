//! Response DTOs for the replay cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheSnapshot, CacheStats, NodeConfig, NodeStatus, Output};

/// Response body for deploying a node (PUT /nodes/:name)
#[derive(Debug, Clone, Serialize)]
pub struct DeployResponse {
    /// Success message
    pub message: String,
    /// Effective configuration of the node
    pub config: NodeConfig,
    /// Status right after restoring from the store
    pub status: NodeStatus,
}

impl DeployResponse {
    pub fn new(config: NodeConfig, status: NodeStatus) -> Self {
        Self {
            message: format!("Node '{}' deployed", config.name),
            config,
            status,
        }
    }
}

/// Response body for delivering a message (POST /nodes/:name/input)
#[derive(Debug, Clone, Serialize)]
pub struct InputResponse {
    /// Node that handled the message
    pub node: String,
    /// Sends on the output port, in order
    pub sends: Vec<Output>,
}

impl InputResponse {
    pub fn new(node: impl Into<String>, sends: Vec<Output>) -> Self {
        Self {
            node: node.into(),
            sends,
        }
    }
}

/// Response body for node status (GET /nodes/:name/status)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub node: String,
    pub status: NodeStatus,
    pub stats: CacheStats,
}

impl StatusResponse {
    pub fn new(node: impl Into<String>, status: NodeStatus, stats: CacheStats) -> Self {
        Self {
            node: node.into(),
            status,
            stats,
        }
    }
}

/// Response body for the retained cache (GET /nodes/:name/cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheResponse {
    pub node: String,
    /// Retained messages by key, in key-insertion order
    pub cache: CacheSnapshot,
}

impl CacheResponse {
    pub fn new(node: impl Into<String>, cache: CacheSnapshot) -> Self {
        Self {
            node: node.into(),
            cache,
        }
    }
}

/// Response body for undeploying a node (DELETE /nodes/:name)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The node that was removed
    pub node: String,
}

impl DeleteResponse {
    pub fn new(node: impl Into<String>) -> Self {
        let node = node.into();
        Self {
            message: format!("Node '{}' removed", node),
            node,
        }
    }
}

/// Response body for listing nodes (GET /nodes)
#[derive(Debug, Clone, Serialize)]
pub struct NodeListResponse {
    pub nodes: Vec<String>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
