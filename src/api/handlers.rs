//! API Handlers
//!
//! HTTP request handlers for each replay cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::cache::{FileStore, MemoryStore, Message, PersistentStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CacheResponse, DeleteResponse, DeployRequest, DeployResponse, HealthResponse, InputResponse,
    NodeListResponse, StatusResponse,
};
use crate::registry::NodeRegistry;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Deployed cache nodes
    pub registry: NodeRegistry,
    /// Defaults for node configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState around an existing registry.
    pub fn new(registry: NodeRegistry, config: Config) -> Self {
        Self {
            registry,
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses a file store when `store_dir` is set, an in-memory store otherwise.
    pub fn from_config(config: &Config) -> Result<Self> {
        let persistent: Arc<dyn PersistentStore> = match &config.store_dir {
            Some(dir) => Arc::new(FileStore::open(dir)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(NodeRegistry::new(persistent), config.clone()))
    }
}

/// Handler for PUT /nodes/:name
///
/// Deploys (or redeploys) a cache node.
pub async fn deploy_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<DeployRequest>,
) -> Result<Json<DeployResponse>> {
    let config = req.into_config(name, &state.config);
    let handle = state.registry.deploy(config).await?;

    let node = handle.lock().await;
    Ok(Json(DeployResponse::new(
        node.config().clone(),
        node.status().clone(),
    )))
}

/// Handler for POST /nodes/:name/input
///
/// Delivers one message to a node's input port.
pub async fn input_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(message): Json<Message>,
) -> Result<Json<InputResponse>> {
    if !message.is_object() {
        return Err(CacheError::InvalidRequest(
            "Message must be a JSON object".to_string(),
        ));
    }

    let sends = state.registry.deliver(&name, message).await?;
    debug!("Node '{}' produced {} sends", name, sends.len());

    Ok(Json(InputResponse::new(name, sends)))
}

/// Handler for GET /nodes/:name/status
pub async fn status_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StatusResponse>> {
    let (status, stats) = state
        .registry
        .with_node(&name, |node| (node.status().clone(), node.stats()))
        .await?;

    Ok(Json(StatusResponse::new(name, status, stats)))
}

/// Handler for GET /nodes/:name/cache
///
/// Returns the retained messages without replaying them.
pub async fn cache_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CacheResponse>> {
    let snapshot = state.registry.with_node(&name, |node| node.snapshot()).await?;

    Ok(Json(CacheResponse::new(name, snapshot)))
}

/// Handler for DELETE /nodes/:name
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.registry.remove(&name).await?;

    Ok(Json(DeleteResponse::new(name)))
}

/// Handler for GET /nodes
pub async fn list_handler(State(state): State<AppState>) -> Json<NodeListResponse> {
    Json(NodeListResponse {
        nodes: state.registry.names().await,
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
