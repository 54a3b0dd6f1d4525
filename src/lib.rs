//! Replay Cache - a message cache server
//!
//! Hosts named cache nodes that forward messages, retain the most recent ones
//! per key, persist them, and replay or clear them on command.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;

pub use api::AppState;
pub use config::Config;
pub use registry::NodeRegistry;
