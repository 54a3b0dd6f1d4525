//! Cache Module
//!
//! Bounded per-key message retention with persistence and replay.

mod message;
mod node;
mod persist;
mod retained;
mod stats;
mod store;


// Re-export public types
pub use message::{
    classify, extract_key, mark_replayed, BucketKey, ControlCommand, Inbound, JsonCloner,
    Message, MessageCloner, CONNECTION_ID_FIELD, MSG_ID_FIELD, REPLAY_MARKER,
    REPLAY_MARKER_FIELD,
};
pub use node::{CacheNode, NodeConfig, NodeStatus, Output, SharedCache};
pub use persist::{context_key, ContextLevel, FileStore, MemoryStore, PersistentStore};
pub use retained::RetainedList;
pub use stats::CacheStats;
pub use store::{BucketSnapshot, CacheSnapshot, CacheStore};

// == Public Constants ==
/// Maximum allowed node name length in bytes
pub const MAX_NAME_LENGTH: usize = 256;
