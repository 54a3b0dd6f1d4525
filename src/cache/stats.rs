//! Cache Statistics Module
//!
//! Counts what a cache node has done with the messages it received.

use serde::Serialize;

// == Cache Stats ==
/// Per-node activity counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Data messages forwarded on the output port
    pub messages_forwarded: u64,
    /// Data messages copied into the cache
    pub messages_cached: u64,
    /// Messages dropped by the per-key bound
    pub evictions: u64,
    /// Replay batches emitted
    pub replays: u64,
    /// Clear commands applied
    pub clears: u64,
    /// Control messages with an unknown command
    pub ignored_controls: u64,
    /// Data messages that could not be copied into the cache
    pub clone_failures: u64,
    /// Failed writes to the persistent store
    pub persist_failures: u64,
    /// Current number of cache keys
    pub total_keys: usize,
    /// Current number of retained messages across all keys
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_forward(&mut self) {
        self.messages_forwarded += 1;
    }

    pub fn record_cached(&mut self) {
        self.messages_cached += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_replay(&mut self) {
        self.replays += 1;
    }

    pub fn record_clear(&mut self) {
        self.clears += 1;
    }

    pub fn record_ignored_control(&mut self) {
        self.ignored_controls += 1;
    }

    pub fn record_clone_failure(&mut self) {
        self.clone_failures += 1;
    }

    pub fn record_persist_failure(&mut self) {
        self.persist_failures += 1;
    }

    // == Update Sizes ==
    /// Updates the current key and entry counts.
    pub fn set_sizes(&mut self, keys: usize, entries: usize) {
        self.total_keys = keys;
        self.total_entries = entries;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.messages_cached, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_record_evictions_accumulates() {
        let mut stats = CacheStats::new();
        stats.record_evictions(2);
        stats.record_evictions(0);
        stats.record_evictions(3);
        assert_eq!(stats.evictions, 5);
    }

    #[test]
    fn test_set_sizes() {
        let mut stats = CacheStats::new();
        stats.set_sizes(3, 42);
        assert_eq!(stats.total_keys, 3);
        assert_eq!(stats.total_entries, 42);
    }

    #[test]
    fn test_serialize() {
        let mut stats = CacheStats::new();
        stats.record_replay();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["replays"], 1);
        assert_eq!(json["clears"], 0);
    }
}
