//! Persistence Module
//!
//! The key/value store a cache node mirrors its state into, with an
//! in-memory backend and a JSON file backend.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::CacheSnapshot;
use crate::error::{CacheError, Result};

// == Context Level ==
/// How widely a persisted cache is shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextLevel {
    /// Private to one node
    #[default]
    Node,
    /// Shared by the nodes of one flow
    Flow,
    /// Shared by every node
    Global,
}

/// Builds the key a node's cache is stored under.
///
/// Names are percent-encoded so `:` only ever appears as the separator and
/// distinct (node, var) pairs never share a key.
pub fn context_key(level: ContextLevel, node_name: &str, var_name: &str) -> String {
    let var = urlencoding::encode(var_name);
    match level {
        ContextLevel::Node => format!("node:{}:{}", urlencoding::encode(node_name), var),
        ContextLevel::Flow => format!("flow:{}", var),
        ContextLevel::Global => format!("global:{}", var),
    }
}

// == Persistent Store ==
/// Durable key/value store, partitioned into named scopes.
pub trait PersistentStore: Send + Sync {
    /// Loads the snapshot stored under `key` in `scope`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn get(&self, key: &str, scope: &str) -> Result<Option<CacheSnapshot>>;

    /// Replaces the snapshot stored under `key` in `scope`.
    fn set(&self, key: &str, value: &CacheSnapshot, scope: &str) -> Result<()>;
}

// == Memory Store ==
/// Process-local store. Contents do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), CacheSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str, scope: &str) -> Result<Option<CacheSnapshot>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&(scope.to_string(), key.to_string())).cloned())
    }

    fn set(&self, key: &str, value: &CacheSnapshot, scope: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert((scope.to_string(), key.to_string()), value.clone());
        Ok(())
    }
}

// == File Store ==
/// Longest path component written by [`FileStore`]
const MAX_COMPONENT_LEN: usize = 128;

/// Stores each snapshot as `<root>/<scope>/<key>.json`.
///
/// Scope and key are hex-encoded, so every distinct pair gets its own file.
/// Long encodings are split across nested directories.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str, scope: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(encode_component(scope));

        let mut key_parts = encode_component(key);
        if let Some(file) = key_parts.pop() {
            path.extend(key_parts);
            path.push(format!("{}.json", file));
        }
        path
    }
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str, scope: &str) -> Result<Option<CacheSnapshot>> {
        let path = self.path_for(key, scope);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_slice(&data).map_err(|e| {
            CacheError::Persistence(format!("corrupt cache file {}: {}", path.display(), e))
        })?;
        Ok(Some(snapshot))
    }

    fn set(&self, key: &str, value: &CacheSnapshot, scope: &str) -> Result<()> {
        let path = self.path_for(key, scope);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        // Write beside the target then rename, so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(value)?)?;
        fs::rename(&tmp, &path)?;

        debug!("Persisted {} buckets to {}", value.buckets.len(), path.display());
        Ok(())
    }
}

/// Maps a scope or key onto one or more path components.
///
/// Hex output never contains `_`, so the empty string gets its own name.
fn encode_component(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return vec!["_".to_string()];
    }
    hex::encode(raw.as_bytes())
        .as_bytes()
        .chunks(MAX_COMPONENT_LEN)
        .map(|chunk| chunk.iter().map(|&b| b as char).collect())
        .collect()
}
