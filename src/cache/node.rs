//! Cache Node Module
//!
//! A single deployed cache: forwards data messages, retains a bounded copy of
//! them per key, mirrors the retained set into a persistent store, and answers
//! replay and clear commands.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{
    classify, context_key, extract_key, mark_replayed, BucketKey, CacheSnapshot, CacheStats,
    CacheStore, ContextLevel, ControlCommand, Inbound, Message, MessageCloner, PersistentStore,
    MAX_NAME_LENGTH,
};
use crate::error::{CacheError, Result};

// == Node Config ==
/// Immutable settings of a cache node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeConfig {
    /// Unique node name
    pub name: String,
    /// Message field whose value buckets messages
    pub cache_key_field: String,
    /// Keep every message in one bucket, ignoring the key field
    pub cache_all: bool,
    /// Messages retained per key, 0 = unlimited
    pub max_entries: usize,
    /// Persistence scope the cache is written to
    pub store_name: String,
    /// How widely the persisted cache is shared
    pub context_level: ContextLevel,
    /// Variable name the cache is stored under
    pub var_name: String,
}

impl NodeConfig {
    /// Creates a config with the default settings for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cache_key_field: "topic".to_string(),
            cache_all: false,
            max_entries: 1,
            store_name: "default".to_string(),
            context_level: ContextLevel::Node,
            var_name: "uib_cache".to_string(),
        }
    }

    // == Validate ==
    /// Checks the settings a node cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CacheError::InvalidRequest(
                "Node name cannot be empty".to_string(),
            ));
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Node name exceeds maximum length of {} bytes",
                MAX_NAME_LENGTH
            )));
        }
        if !self.cache_all && self.cache_key_field.trim().is_empty() {
            return Err(CacheError::InvalidRequest(
                "Cache key field cannot be empty unless caching all messages".to_string(),
            ));
        }
        if self.store_name.trim().is_empty() {
            return Err(CacheError::InvalidRequest(
                "Store name cannot be empty".to_string(),
            ));
        }
        if self.var_name.trim().is_empty() {
            return Err(CacheError::InvalidRequest(
                "Variable name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The key this node's cache is persisted under.
    pub fn persistence_key(&self) -> String {
        context_key(self.context_level, &self.name, &self.var_name)
    }

    /// Cache key of a data message under this configuration.
    pub fn key_for(&self, message: &Message) -> BucketKey {
        if self.cache_all {
            BucketKey::Default
        } else {
            extract_key(message, &self.cache_key_field)
        }
    }

    /// Status line for a cache holding `total` messages.
    pub fn status_text(&self, total: usize) -> String {
        let label = if self.cache_all {
            "all"
        } else {
            self.cache_key_field.as_str()
        };
        format!("{} cache: {} entries", label, total)
    }
}

// == Shared Cache ==
/// Retained messages of one persistence key. Nodes persisting under the same
/// key hold the same instance, and every write to it happens under its lock.
pub type SharedCache = Arc<Mutex<CacheStore>>;

fn lock(cache: &SharedCache) -> MutexGuard<'_, CacheStore> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

// == Output ==
/// One send on the node's output port.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    /// A single forwarded message
    Message(Message),
    /// A replay, sent as one ordered batch
    Batch(Vec<Message>),
}

// == Node Status ==
/// Human-readable summary of what the node holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeStatus {
    pub text: String,
    /// RFC 3339 time of the last update
    pub updated_at: String,
}

impl NodeStatus {
    fn set(&mut self, text: String) {
        self.text = text;
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

// == Node State ==
/// Everything about a node that changes while it runs, apart from the cache.
#[derive(Debug, Default)]
struct NodeState {
    stats: CacheStats,
    status: NodeStatus,
}

// == Cache Node ==
/// A deployed bounded replay cache.
pub struct CacheNode {
    config: NodeConfig,
    state: NodeState,
    cache: SharedCache,
    persistence_key: String,
    persistent: Arc<dyn PersistentStore>,
    cloner: Arc<dyn MessageCloner>,
}

impl std::fmt::Debug for CacheNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheNode")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("persistence_key", &self.persistence_key)
            .finish_non_exhaustive()
    }
}

impl CacheNode {
    // == Constructor ==
    /// Creates a node and restores its cache from the persistent store.
    ///
    /// A missing or unreadable stored value starts the node with an empty
    /// cache.
    pub fn new(
        config: NodeConfig,
        persistent: Arc<dyn PersistentStore>,
        cloner: Arc<dyn MessageCloner>,
    ) -> Result<Self> {
        let mut node = Self::assemble(config, SharedCache::default(), persistent, cloner)?;
        node.restore();
        node.refresh_status();
        Ok(node)
    }

    /// Creates a node on top of a cache another live node already holds for
    /// the same persistence key. Nothing is read from the store.
    pub fn with_shared_cache(
        config: NodeConfig,
        cache: SharedCache,
        persistent: Arc<dyn PersistentStore>,
        cloner: Arc<dyn MessageCloner>,
    ) -> Result<Self> {
        let mut node = Self::assemble(config, cache, persistent, cloner)?;
        node.refresh_status();
        Ok(node)
    }

    fn assemble(
        config: NodeConfig,
        cache: SharedCache,
        persistent: Arc<dyn PersistentStore>,
        cloner: Arc<dyn MessageCloner>,
    ) -> Result<Self> {
        config.validate()?;
        let persistence_key = config.persistence_key();
        Ok(Self {
            config,
            state: NodeState::default(),
            cache,
            persistence_key,
            persistent,
            cloner,
        })
    }

    fn restore(&mut self) {
        let loaded = self
            .persistent
            .get(&self.persistence_key, &self.config.store_name);

        match loaded {
            Ok(Some(snapshot)) => {
                let (restored, dropped) =
                    CacheStore::from_snapshot(snapshot, self.config.max_entries);
                info!(
                    "Node '{}' restored {} entries under {} keys",
                    self.config.name,
                    restored.total_entries(),
                    restored.len_keys()
                );
                let mut cache = lock(&self.cache);
                *cache = restored;
                if dropped > 0 {
                    debug!(
                        "Node '{}' trimmed {} restored entries to the current bound",
                        self.config.name, dropped
                    );
                    if !self.write(&cache) {
                        self.state.stats.record_persist_failure();
                    }
                }
            }
            Ok(None) => {
                info!("Node '{}' cold start, no stored cache", self.config.name);
            }
            Err(e) => {
                warn!(
                    "Node '{}' could not load stored cache, starting empty: {}",
                    self.config.name, e
                );
            }
        }
    }

    // == Handle Inbound ==
    /// Processes one message from the input port and returns what the node
    /// sends on its output port, in order.
    ///
    /// Persistence writes happen inline, so async callers should run this on
    /// a blocking thread.
    pub fn handle_inbound(&mut self, message: Message) -> Vec<Output> {
        match classify(&message) {
            Inbound::Control {
                command: ControlCommand::Replay,
                connection_id,
            } => vec![self.replay(connection_id.as_deref())],
            Inbound::Control {
                command: ControlCommand::Clear,
                ..
            } => {
                self.clear();
                Vec::new()
            }
            Inbound::UnknownControl => {
                debug!(
                    "Node '{}' ignoring control message without a known command",
                    self.config.name
                );
                self.state.stats.record_ignored_control();
                Vec::new()
            }
            Inbound::Data => self.forward_and_retain(message),
        }
    }

    // == Replay ==
    /// Builds the replay batch. The cache is not modified.
    fn replay(&mut self, connection_id: Option<&str>) -> Output {
        let batch: Vec<Message> = lock(&self.cache)
            .replay_batch()
            .into_iter()
            .map(|message| mark_replayed(message, connection_id))
            .collect();

        info!(
            "Node '{}' replaying {} messages{}",
            self.config.name,
            batch.len(),
            connection_id
                .map(|id| format!(" to connection {}", id))
                .unwrap_or_default()
        );
        self.state.stats.record_replay();
        Output::Batch(batch)
    }

    // == Clear ==
    fn clear(&mut self) {
        let mut cache = lock(&self.cache);
        cache.clear();
        self.state.stats.record_clear();
        info!("Node '{}' cache cleared", self.config.name);

        if !self.write(&cache) {
            self.state.stats.record_persist_failure();
        }
        self.state.status.set(self.config.status_text(0));
    }

    // == Data Path ==
    fn forward_and_retain(&mut self, message: Message) -> Vec<Output> {
        let key = self.config.key_for(&message);
        let copy = self.cloner.clone_for_cache(&message);

        self.state.stats.record_forward();
        let outputs = vec![Output::Message(message)];

        match copy {
            Ok(copy) => {
                // Held until the write lands so writers sharing the cache
                // persist one after another
                let mut cache = lock(&self.cache);
                let evicted = cache.append(key.clone(), copy, self.config.max_entries);
                self.state.stats.record_cached();
                self.state.stats.record_evictions(evicted);
                debug!(
                    "Node '{}' cached message under '{}' ({} evicted)",
                    self.config.name, key, evicted
                );

                if !self.write(&cache) {
                    self.state.stats.record_persist_failure();
                }
                self.state
                    .status
                    .set(self.config.status_text(cache.total_entries()));
            }
            Err(e) => {
                warn!(
                    "Node '{}' forwarded a message it could not cache: {}",
                    self.config.name, e
                );
                self.state.stats.record_clone_failure();
            }
        }

        outputs
    }

    // == Persistence ==
    /// Writes `cache` to the persistent store. Failures are logged and
    /// reported as `false`, never returned.
    fn write(&self, cache: &CacheStore) -> bool {
        let snapshot = cache.to_snapshot();
        match self
            .persistent
            .set(&self.persistence_key, &snapshot, &self.config.store_name)
        {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Node '{}' failed to persist cache to store '{}': {}",
                    self.config.name, self.config.store_name, e
                );
                false
            }
        }
    }

    fn refresh_status(&mut self) {
        let total = lock(&self.cache).total_entries();
        self.state.status.set(self.config.status_text(total));
    }

    // == Close ==
    /// Writes the cache one last time before the node is undeployed.
    pub fn close(&mut self) {
        let cache = lock(&self.cache);
        if !self.write(&cache) {
            self.state.stats.record_persist_failure();
        }
        drop(cache);
        info!("Node '{}' closed", self.config.name);
    }

    // == Accessors ==
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn status(&self) -> &NodeStatus {
        &self.state.status
    }

    /// Current counters, with sizes taken from the live cache.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.state.stats.clone();
        let cache = lock(&self.cache);
        stats.set_sizes(cache.len_keys(), cache.total_entries());
        stats
    }

    /// Copy of the retained messages in their persisted form.
    pub fn snapshot(&self) -> CacheSnapshot {
        lock(&self.cache).to_snapshot()
    }

    /// Locks and returns the live cache.
    pub fn store(&self) -> MutexGuard<'_, CacheStore> {
        lock(&self.cache)
    }

    /// The cache instance, for nodes deployed under the same persistence key.
    pub fn shared_cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileStore, JsonCloner, MemoryStore};
    use serde_json::json;
    use tempfile::tempdir;

    struct FailingStore;

    impl PersistentStore for FailingStore {
        fn get(&self, _key: &str, _scope: &str) -> Result<Option<CacheSnapshot>> {
            Err(CacheError::Persistence("store offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &CacheSnapshot, _scope: &str) -> Result<()> {
            Err(CacheError::Persistence("store offline".to_string()))
        }
    }

    struct RejectingCloner;

    impl MessageCloner for RejectingCloner {
        fn clone_for_cache(&self, _message: &Message) -> Result<Message> {
            Err(CacheError::Clone("not cloneable".to_string()))
        }
    }

    fn node_with(config: NodeConfig, store: Arc<dyn PersistentStore>) -> CacheNode {
        CacheNode::new(config, store, Arc::new(JsonCloner)).unwrap()
    }

    fn node(max_entries: usize) -> (CacheNode, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = NodeConfig {
            max_entries,
            ..NodeConfig::new("n1")
        };
        (node_with(config, store.clone()), store)
    }

    fn replay_msg() -> Message {
        json!({"isControl": true, "cacheControlCommand": "REPLAY"})
    }

    fn clear_msg() -> Message {
        json!({"isControl": true, "cacheControlCommand": "CLEAR"})
    }

    fn batch(outputs: Vec<Output>) -> Vec<Message> {
        match outputs.as_slice() {
            [Output::Batch(batch)] => batch.clone(),
            other => panic!("expected a single batch, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(NodeConfig::new("ok").validate().is_ok());
        assert!(NodeConfig::new("").validate().is_err());
        assert!(NodeConfig::new("x".repeat(MAX_NAME_LENGTH + 1)).validate().is_err());

        let no_key = NodeConfig {
            cache_key_field: String::new(),
            ..NodeConfig::new("n")
        };
        assert!(no_key.validate().is_err());

        let cache_all = NodeConfig {
            cache_all: true,
            ..no_key
        };
        assert!(cache_all.validate().is_ok());
    }

    #[test]
    fn test_spec_scenario() {
        let (mut node, _) = node(2);

        for n in 1..=3 {
            node.handle_inbound(json!({"topic": "a", "payload": n}));
        }
        assert_eq!(
            node.store().replay_batch(),
            vec![
                json!({"topic": "a", "payload": 2}),
                json!({"topic": "a", "payload": 3}),
            ]
        );

        let replayed = batch(node.handle_inbound(replay_msg()));
        assert_eq!(
            replayed,
            vec![
                json!({"topic": "a", "payload": 2, "replayMarker": "REPLAY"}),
                json!({"topic": "a", "payload": 3, "replayMarker": "REPLAY"}),
            ]
        );

        assert!(node.handle_inbound(clear_msg()).is_empty());
        assert!(node.store().is_empty());

        node.handle_inbound(json!({"topic": "b", "payload": 9}));
        let snapshot = node.snapshot();
        assert_eq!(snapshot.buckets.len(), 1);
        assert_eq!(snapshot.buckets[0].key, BucketKey::from("b"));
        assert_eq!(node.store().total_entries(), 1);
    }

    #[test]
    fn test_pass_through_is_unchanged() {
        let (mut node, _) = node(1);
        let msg = json!({"_msgid": "m1", "topic": "a", "payload": {"deep": [1, 2]}});

        let outputs = node.handle_inbound(msg.clone());

        assert_eq!(outputs, vec![Output::Message(msg)]);
        // The retained copy lost its delivery id
        assert_eq!(
            node.store().entries("a").unwrap().iter().next().unwrap(),
            &json!({"topic": "a", "payload": {"deep": [1, 2]}})
        );
    }

    #[test]
    fn test_replay_targets_connection() {
        let (mut node, _) = node(1);
        node.handle_inbound(json!({"topic": "a", "payload": 1}));

        let replayed = batch(node.handle_inbound(json!({
            "isControl": true,
            "cacheControlCommand": "REPLAY",
            "connectionId": "conn-7"
        })));

        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[0]["connectionId"], "conn-7");
        assert_eq!(replayed[0]["replayMarker"], "REPLAY");
    }

    #[test]
    fn test_replay_does_not_mutate() {
        let (mut node, store) = node(3);
        node.handle_inbound(json!({"topic": "a", "payload": 1}));
        node.handle_inbound(json!({"topic": "b", "payload": 2}));
        let before = store.get("node:n1:uib_cache", "default").unwrap();

        let first = batch(node.handle_inbound(replay_msg()));
        let second = batch(node.handle_inbound(replay_msg()));

        assert_eq!(first, second);
        assert_eq!(node.stats().messages_cached, 2);
        assert_eq!(store.get("node:n1:uib_cache", "default").unwrap(), before);
    }

    #[test]
    fn test_replay_of_empty_cache() {
        let (mut node, _) = node(1);
        assert!(batch(node.handle_inbound(replay_msg())).is_empty());
    }

    #[test]
    fn test_client_connect_replays() {
        let (mut node, _) = node(1);
        node.handle_inbound(json!({"topic": "a", "payload": 1}));

        let replayed = batch(node.handle_inbound(json!({
            "isControl": true,
            "controlEvent": "client connect",
            "connectionId": "s1"
        })));
        assert_eq!(replayed[0]["connectionId"], "s1");
    }

    #[test]
    fn test_unknown_control_is_ignored() {
        let (mut node, _) = node(1);
        node.handle_inbound(json!({"topic": "a", "payload": 1}));

        let outputs = node.handle_inbound(json!({"isControl": true, "cacheControlCommand": "NOPE"}));

        assert!(outputs.is_empty());
        assert_eq!(node.store().total_entries(), 1);
        assert_eq!(node.stats().ignored_controls, 1);
    }

    #[test]
    fn test_clear_is_persisted() {
        let (mut node, store) = node(1);
        node.handle_inbound(json!({"topic": "a", "payload": 1}));
        node.handle_inbound(clear_msg());
        node.handle_inbound(clear_msg());

        let persisted = store.get("node:n1:uib_cache", "default").unwrap().unwrap();
        assert!(persisted.is_empty());
        assert_eq!(node.stats().clears, 2);
    }

    #[test]
    fn test_cache_all_mode() {
        let store = Arc::new(MemoryStore::new());
        let config = NodeConfig {
            cache_all: true,
            max_entries: 2,
            ..NodeConfig::new("all")
        };
        let mut node = node_with(config, store);

        node.handle_inbound(json!({"topic": "a", "payload": 1}));
        node.handle_inbound(json!({"topic": "b", "payload": 2}));
        node.handle_inbound(json!({"payload": 3}));

        assert_eq!(node.store().len_keys(), 1);
        let replayed = batch(node.handle_inbound(replay_msg()));
        let payloads: Vec<i64> = replayed.iter().map(|m| m["payload"].as_i64().unwrap()).collect();
        assert_eq!(payloads, vec![2, 3]);
        assert_eq!(node.status().text, "all cache: 2 entries");
    }

    #[test]
    fn test_restores_from_store() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut first = node_with(NodeConfig { max_entries: 5, ..NodeConfig::new("n1") }, store.clone());
            for n in 1..=3 {
                first.handle_inbound(json!({"topic": "a", "payload": n}));
            }
            first.close();
        }

        // Restarting with a smaller bound keeps only the newest
        let restored = node_with(NodeConfig { max_entries: 2, ..NodeConfig::new("n1") }, store);
        let payloads: Vec<i64> = restored
            .store()
            .replay_batch()
            .iter()
            .map(|m| m["payload"].as_i64().unwrap())
            .collect();
        assert_eq!(payloads, vec![2, 3]);
        assert_eq!(restored.status().text, "topic cache: 2 entries");
    }

    #[test]
    fn test_store_failures_do_not_block_forwarding() {
        let mut node = node_with(NodeConfig::new("n1"), Arc::new(FailingStore));
        let msg = json!({"topic": "a", "payload": 1});

        let outputs = node.handle_inbound(msg.clone());

        assert_eq!(outputs, vec![Output::Message(msg)]);
        assert_eq!(node.store().total_entries(), 1);
        assert_eq!(node.stats().persist_failures, 1);
    }

    #[test]
    fn test_clone_failure_still_forwards() {
        let config = NodeConfig::new("n1");
        let mut node =
            CacheNode::new(config, Arc::new(MemoryStore::new()), Arc::new(RejectingCloner)).unwrap();
        let msg = json!({"topic": "a", "payload": 1});

        let outputs = node.handle_inbound(msg.clone());

        assert_eq!(outputs, vec![Output::Message(msg)]);
        assert!(node.store().is_empty());
        assert_eq!(node.stats().clone_failures, 1);
        assert_eq!(node.stats().messages_forwarded, 1);
    }

    #[test]
    fn test_flow_level_nodes_restore_shared_key() {
        let store = Arc::new(MemoryStore::new());
        let shared = |name: &str| NodeConfig {
            context_level: ContextLevel::Flow,
            ..NodeConfig::new(name)
        };

        let mut writer = node_with(shared("w"), store.clone());
        writer.handle_inbound(json!({"topic": "a", "payload": 1}));

        let reader = node_with(shared("r"), store);
        assert_eq!(reader.store().total_entries(), 1);
    }

    #[test]
    fn test_shared_cache_writers_lose_nothing() {
        let store = Arc::new(MemoryStore::new());
        let shared = |name: &str| NodeConfig {
            context_level: ContextLevel::Flow,
            max_entries: 5,
            ..NodeConfig::new(name)
        };

        let mut w = node_with(shared("w"), store.clone());
        let mut r = CacheNode::with_shared_cache(
            shared("r"),
            w.shared_cache(),
            store.clone(),
            Arc::new(JsonCloner),
        )
        .unwrap();

        w.handle_inbound(json!({"topic": "a", "payload": 1}));
        r.handle_inbound(json!({"topic": "b", "payload": 2}));
        w.handle_inbound(json!({"topic": "a", "payload": 3}));

        let persisted = store.get("flow:uib_cache", "default").unwrap().unwrap();
        let keys: Vec<BucketKey> = persisted.buckets.iter().map(|b| b.key.clone()).collect();
        assert_eq!(keys, vec![BucketKey::from("a"), BucketKey::from("b")]);
        assert_eq!(w.snapshot(), persisted);
        assert_eq!(r.snapshot(), persisted);
        assert_eq!(r.stats().total_entries, 3);
    }

    #[test]
    fn test_node_names_with_separators_do_not_share_files() {
        let dir = tempdir().unwrap();
        let store: Arc<dyn PersistentStore> = Arc::new(FileStore::open(dir.path()).unwrap());

        let mut spaced = node_with(NodeConfig::new("a b"), store.clone());
        spaced.handle_inbound(json!({"topic": "a", "payload": 1}));
        spaced.close();

        for name in ["a_b", "a.b", "a:b"] {
            let other = node_with(NodeConfig::new(name), store.clone());
            assert!(other.store().is_empty(), "{} restored another node's cache", name);
        }

        let colon = node_with(
            NodeConfig {
                var_name: "c".to_string(),
                ..NodeConfig::new("a:b")
            },
            store.clone(),
        );
        let split = NodeConfig {
            var_name: "b:c".to_string(),
            ..NodeConfig::new("a")
        };
        assert_ne!(colon.config().persistence_key(), split.persistence_key());
    }

    #[test]
    fn test_status_text() {
        let keyed = NodeConfig::new("n");
        assert_eq!(keyed.status_text(3), "topic cache: 3 entries");

        let all = NodeConfig {
            cache_all: true,
            ..NodeConfig::new("n")
        };
        assert_eq!(all.status_text(0), "all cache: 0 entries");
    }

    #[test]
    fn test_cache_all_key_is_default_bucket() {
        let all = NodeConfig {
            cache_all: true,
            ..NodeConfig::new("n")
        };
        assert_eq!(all.key_for(&json!({"topic": "__all__"})), BucketKey::Default);
        assert_eq!(
            NodeConfig::new("n").key_for(&json!({"topic": "__all__"})),
            BucketKey::from("__all__")
        );
    }

    #[test]
    fn test_output_serializes_untagged() {
        let single = serde_json::to_value(Output::Message(json!({"a": 1}))).unwrap();
        let many = serde_json::to_value(Output::Batch(vec![json!({"a": 1})])).unwrap();
        assert_eq!(single, json!({"a": 1}));
        assert_eq!(many, json!([{"a": 1}]));
    }
}
