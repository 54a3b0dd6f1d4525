//! Cache Store Module
//!
//! Per-key retained lists kept in key-insertion order, and the snapshot form
//! written to the persistent store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cache::{BucketKey, Message, RetainedList};

// == Snapshot ==
/// One key's retained messages as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSnapshot {
    /// `null` for the default bucket
    pub key: BucketKey,
    pub messages: RetainedList,
}

/// Persisted form of a [`CacheStore`]. Buckets are listed in key-insertion
/// order so a restored cache replays in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub buckets: Vec<BucketSnapshot>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

// == Cache Store ==
/// In-memory mirror of a node's retained messages.
///
/// Iteration order of `buckets` is the order keys were first seen.
#[derive(Debug, Default, Clone)]
pub struct CacheStore {
    buckets: IndexMap<BucketKey, RetainedList>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Restore ==
    /// Rebuilds a store from a snapshot, trimming every list to `max_entries`.
    ///
    /// Duplicate keys in a snapshot are merged in order. Returns the store and
    /// the number of messages dropped by trimming.
    pub fn from_snapshot(snapshot: CacheSnapshot, max_entries: usize) -> (Self, usize) {
        let mut store = Self::new();
        let mut dropped = 0;
        for bucket in snapshot.buckets {
            for message in bucket.messages.iter() {
                dropped += store.append(bucket.key.clone(), message.clone(), max_entries);
            }
        }
        (store, dropped)
    }

    // == Append ==
    /// Appends a message to the list for `key`, evicting the oldest entries
    /// beyond `max_entries`.
    ///
    /// Returns the number of evicted messages.
    pub fn append(
        &mut self,
        key: impl Into<BucketKey>,
        message: Message,
        max_entries: usize,
    ) -> usize {
        self.buckets
            .entry(key.into())
            .or_default()
            .push(message, max_entries)
    }

    // == Replay Batch ==
    /// Copies every retained message, keys in insertion order and each list
    /// oldest first. The store is left untouched.
    pub fn replay_batch(&self) -> Vec<Message> {
        self.buckets
            .values()
            .flat_map(|list| list.iter().cloned())
            .collect()
    }

    // == Clear ==
    /// Removes every key and message.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    // == Entries ==
    /// Returns the retained list for a key.
    pub fn entries(&self, key: impl Into<BucketKey>) -> Option<&RetainedList> {
        self.buckets.get(&key.into())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &BucketKey> {
        self.buckets.keys()
    }

    // == Sizes ==
    /// Number of keys with a retained list.
    pub fn len_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Number of retained messages across all keys.
    pub fn total_entries(&self) -> usize {
        self.buckets.values().map(RetainedList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    // == Snapshot ==
    /// Captures the store in its persisted form.
    pub fn to_snapshot(&self) -> CacheSnapshot {
        let buckets = self
            .buckets
            .iter()
            .map(|(key, messages)| BucketSnapshot {
                key: key.clone(),
                messages: messages.clone(),
            })
            .collect();
        CacheSnapshot { buckets }
    }
}
