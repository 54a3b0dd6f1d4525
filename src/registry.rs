//! Node Registry
//!
//! Holds the cache nodes deployed in this process. Each node sits behind its
//! own mutex so the append, trim and persist steps of one message complete
//! before the node sees the next one. Node work runs on tokio's blocking pool
//! because persisting touches the file system.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, Weak};

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::cache::{
    CacheNode, CacheStore, JsonCloner, Message, MessageCloner, NodeConfig, Output,
    PersistentStore, SharedCache,
};
use crate::error::{CacheError, Result};

/// Shared handle to one deployed node.
pub type NodeHandle = Arc<Mutex<CacheNode>>;

/// Live caches by (store name, persistence key).
type SharedCaches = HashMap<(String, String), Weak<std::sync::Mutex<CacheStore>>>;

// == Node Registry ==
/// Named cache nodes sharing one persistent store and cloner.
#[derive(Clone)]
pub struct NodeRegistry {
    nodes: Arc<RwLock<HashMap<String, NodeHandle>>>,
    shared: Arc<std::sync::Mutex<SharedCaches>>,
    persistent: Arc<dyn PersistentStore>,
    cloner: Arc<dyn MessageCloner>,
}

impl NodeRegistry {
    /// Creates an empty registry backed by `persistent`, cloning with
    /// [`JsonCloner`].
    pub fn new(persistent: Arc<dyn PersistentStore>) -> Self {
        Self::with_cloner(persistent, Arc::new(JsonCloner))
    }

    pub fn with_cloner(
        persistent: Arc<dyn PersistentStore>,
        cloner: Arc<dyn MessageCloner>,
    ) -> Self {
        Self {
            nodes: Arc::new(RwLock::new(HashMap::new())),
            shared: Arc::new(std::sync::Mutex::new(HashMap::new())),
            persistent,
            cloner,
        }
    }

    // == Deploy ==
    /// Creates a node from `config`, replacing any node of the same name.
    ///
    /// The replaced node is closed first so its final state is persisted
    /// before the new node restores from the store. A node whose persistence
    /// key is already held by a live node joins that node's cache instead of
    /// reading the store.
    pub async fn deploy(&self, config: NodeConfig) -> Result<NodeHandle> {
        config.validate()?;
        let name = config.name.clone();

        let mut nodes = self.nodes.write().await;
        if let Some(old) = nodes.remove(&name) {
            close_node(old).await?;
            info!("Redeploying node '{}'", name);
        }

        let slot = (config.store_name.clone(), config.persistence_key());
        let live = self.live_cache(&slot);
        let persistent = self.persistent.clone();
        let cloner = self.cloner.clone();
        let node = run_blocking(move || match live {
            Some(cache) => CacheNode::with_shared_cache(config, cache, persistent, cloner),
            None => CacheNode::new(config, persistent, cloner),
        })
        .await??;

        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slot, Arc::downgrade(&node.shared_cache()));

        let handle = Arc::new(Mutex::new(node));
        nodes.insert(name.clone(), handle.clone());
        info!("Deployed node '{}'", name);
        Ok(handle)
    }

    /// Returns the cache a live node holds for `slot`, dropping entries whose
    /// nodes are gone.
    fn live_cache(&self, slot: &(String, String)) -> Option<SharedCache> {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.retain(|_, cache| cache.strong_count() > 0);
        shared.get(slot).and_then(Weak::upgrade)
    }

    // == Get ==
    /// Looks up a deployed node.
    pub async fn get(&self, name: &str) -> Result<NodeHandle> {
        self.nodes
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(name.to_string()))
    }

    // == With Node ==
    /// Runs `f` on a node while holding its lock, off the async workers.
    pub async fn with_node<T, F>(&self, name: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut CacheNode) -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.get(name).await?;
        let mut node = handle.lock_owned().await;
        run_blocking(move || f(&mut *node)).await
    }

    // == Deliver ==
    /// Feeds one message to a node and returns its sends.
    ///
    /// The node stays locked until the message is fully processed, persisted
    /// state included.
    pub async fn deliver(&self, name: &str, message: Message) -> Result<Vec<Output>> {
        self.with_node(name, move |node| node.handle_inbound(message))
            .await
    }

    // == Remove ==
    /// Closes and undeploys a node.
    pub async fn remove(&self, name: &str) -> Result<()> {
        let handle = self
            .nodes
            .write()
            .await
            .remove(name)
            .ok_or_else(|| CacheError::NotFound(name.to_string()))?;
        close_node(handle).await?;
        info!("Removed node '{}'", name);
        Ok(())
    }

    /// Names of all deployed nodes, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    // == Close All ==
    /// Closes every node, used on shutdown.
    pub async fn close_all(&self) {
        let handles: Vec<NodeHandle> = self.nodes.read().await.values().cloned().collect();
        for handle in handles {
            if let Err(e) = close_node(handle).await {
                warn!("Failed to close node: {}", e);
            }
        }
    }
}

/// Runs blocking node work on tokio's blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CacheError::Internal(format!("node task failed: {}", e)))
}

async fn close_node(handle: NodeHandle) -> Result<()> {
    let mut node = handle.lock_owned().await;
    run_blocking(move || node.close()).await
}
