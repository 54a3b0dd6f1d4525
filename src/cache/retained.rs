//! Retained List Module
//!
//! The bounded, arrival-ordered list of messages kept for one cache key.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cache::Message;

// == Retained List ==
/// Messages retained for one key, oldest at the front.
///
/// A `max_entries` of 0 means the list is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetainedList {
    messages: VecDeque<Message>,
}

impl RetainedList {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Appends a message, then evicts from the front until the list fits.
    ///
    /// Returns the number of evicted messages.
    pub fn push(&mut self, message: Message, max_entries: usize) -> usize {
        self.messages.push_back(message);
        self.trim(max_entries)
    }

    // == Trim ==
    /// Drops the oldest messages until at most `max_entries` remain.
    pub fn trim(&mut self, max_entries: usize) -> usize {
        if max_entries == 0 {
            return 0;
        }
        let excess = self.messages.len().saturating_sub(max_entries);
        self.messages.drain(..excess);
        excess
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for RetainedList {
    fn from(messages: Vec<Message>) -> Self {
        Self {
            messages: messages.into(),
        }
    }
}
