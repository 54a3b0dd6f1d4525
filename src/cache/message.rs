//! Message Module
//!
//! Reserved message fields, control message classification, cache key
//! extraction and the cloning collaborator used before a message is retained.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Messages are arbitrary JSON objects.
pub type Message = Value;

// == Reserved Fields ==
/// Per-delivery identifier, never retained
pub const MSG_ID_FIELD: &str = "_msgid";
/// Marks a message as a control message
pub const IS_CONTROL_FIELD: &str = "isControl";
/// Command carried by a control message
pub const COMMAND_FIELD: &str = "cacheControlCommand";
/// Connection event carried by a control message from the transport layer
pub const CONTROL_EVENT_FIELD: &str = "controlEvent";
/// Identifies the client connection a control message came from
pub const CONNECTION_ID_FIELD: &str = "connectionId";
/// Added to every replayed copy
pub const REPLAY_MARKER_FIELD: &str = "replayMarker";
/// Value of the replay marker
pub const REPLAY_MARKER: &str = "REPLAY";
/// Control event sent by the transport when a client connects
pub const CLIENT_CONNECT_EVENT: &str = "client connect";

// == Bucket Key ==
/// Identifies one retained list.
///
/// `Default` holds every message in cache-all mode and messages without a
/// usable key. It can never clash with a key taken from a message, and is
/// persisted as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum BucketKey {
    Default,
    Named(String),
}

impl From<Option<String>> for BucketKey {
    fn from(key: Option<String>) -> Self {
        key.map_or(BucketKey::Default, BucketKey::Named)
    }
}

impl From<BucketKey> for Option<String> {
    fn from(key: BucketKey) -> Self {
        match key {
            BucketKey::Default => None,
            BucketKey::Named(name) => Some(name),
        }
    }
}

impl From<&str> for BucketKey {
    fn from(key: &str) -> Self {
        BucketKey::Named(key.to_string())
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Default => f.write_str("(default)"),
            BucketKey::Named(name) => f.write_str(name),
        }
    }
}

// == Control Command ==
/// Commands understood on the control side-channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Emit every retained message as one batch
    Replay,
    /// Drop every retained message
    Clear,
}

impl ControlCommand {
    /// Parses the wire form of a command. Unknown commands yield None.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REPLAY" => Some(ControlCommand::Replay),
            "CLEAR" => Some(ControlCommand::Clear),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControlCommand::Replay => "REPLAY",
            ControlCommand::Clear => "CLEAR",
        }
    }
}

// == Inbound Classification ==
/// What an inbound message asks the cache to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Ordinary traffic: forward and retain
    Data,
    /// A recognised control command
    Control {
        command: ControlCommand,
        connection_id: Option<String>,
    },
    /// Control message with a missing or unrecognised command
    UnknownControl,
}

/// Classifies a message as data or control.
///
/// Only `isControl: true` makes a message a control message. A
/// `controlEvent` of `"client connect"` is handled as a replay request
/// for that connection.
pub fn classify(message: &Message) -> Inbound {
    let is_control = message
        .get(IS_CONTROL_FIELD)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !is_control {
        return Inbound::Data;
    }

    let connection_id = message
        .get(CONNECTION_ID_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string);

    let command = message
        .get(COMMAND_FIELD)
        .and_then(Value::as_str)
        .and_then(ControlCommand::parse)
        .or_else(|| {
            let event = message.get(CONTROL_EVENT_FIELD).and_then(Value::as_str)?;
            (event == CLIENT_CONNECT_EVENT).then_some(ControlCommand::Replay)
        });

    match command {
        Some(command) => Inbound::Control {
            command,
            connection_id,
        },
        None => Inbound::UnknownControl,
    }
}

// == Key Extraction ==
/// Derives the cache key of a message from the configured field.
///
/// Always returns a key: strings are used verbatim, numbers and booleans by
/// their JSON text, everything else falls into [`BucketKey::Default`].
pub fn extract_key(message: &Message, field: &str) -> BucketKey {
    match message.get(field) {
        Some(Value::String(s)) => BucketKey::Named(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => BucketKey::Named(v.to_string()),
        _ => BucketKey::Default,
    }
}

/// Returns a copy of `message` tagged as a replay, optionally targeted at one
/// connection.
pub fn mark_replayed(mut message: Message, connection_id: Option<&str>) -> Message {
    if let Some(obj) = message.as_object_mut() {
        obj.insert(
            REPLAY_MARKER_FIELD.to_string(),
            Value::String(REPLAY_MARKER.to_string()),
        );
        if let Some(id) = connection_id {
            obj.insert(CONNECTION_ID_FIELD.to_string(), Value::String(id.to_string()));
        }
    }
    message
}

// == Message Cloner ==
/// Produces the independent copy of a message that gets retained.
pub trait MessageCloner: Send + Sync {
    /// Deep-copies `message`, leaving out the per-delivery identifier.
    fn clone_for_cache(&self, message: &Message) -> Result<Message>;
}

/// Default cloner for JSON messages.
///
/// `serde_json::Value` owns all of its content, so a clone shares nothing
/// with the source. Only objects can be cached.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCloner;

impl MessageCloner for JsonCloner {
    fn clone_for_cache(&self, message: &Message) -> Result<Message> {
        let obj = message.as_object().ok_or_else(|| {
            CacheError::Clone("only object messages can be cached".to_string())
        })?;
        let mut copy = obj.clone();
        copy.remove(MSG_ID_FIELD);
        Ok(Value::Object(copy))
    }
}
