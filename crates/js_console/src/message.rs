//! Console message log.

use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};

/// How the observer should interpret a message payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Rendered HTML fragment.
    #[serde(rename = "html")]
    Html,
    /// Instruction to wipe the observer's view.
    #[serde(rename = "clear")]
    Clear,
    /// Start of an expanded group; payload is the label.
    #[serde(rename = "group")]
    BeginGroup,
    /// Start of a collapsed group; payload is the label.
    #[serde(rename = "groupCollapsed")]
    BeginGroupCollapsed,
    /// End of the innermost group.
    #[serde(rename = "groupEnd")]
    EndGroup,
}

impl MessageKind {
    /// Tag used on the wire for this kind.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            MessageKind::Html => "html",
            MessageKind::Clear => "clear",
            MessageKind::BeginGroup => "group",
            MessageKind::BeginGroupCollapsed => "groupCollapsed",
            MessageKind::EndGroup => "groupEnd",
        }
    }
}

/// A single rendered log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleMessage {
    index: usize,
    kind: MessageKind,
    payload: String,
}

impl ConsoleMessage {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Append-only store of console messages.
///
/// Indices are assigned by [`MessageLog::append`] only, so they form a dense
/// sequence starting at zero.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<ConsoleMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index.
    pub fn append(&mut self, kind: MessageKind, payload: impl Into<String>) -> usize {
        let index = self.messages.len();
        self.messages.push(ConsoleMessage {
            index,
            kind,
            payload: payload.into(),
        });
        index
    }

    /// Number of entries, which is also the next index to be assigned.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> ConsoleResult<&ConsoleMessage> {
        self.messages.get(index).ok_or(ConsoleError::OutOfRange {
            index,
            len: self.messages.len(),
        })
    }

    /// Entries in `[start_index, len)`. Empty when `start_index >= len`.
    pub fn entries_from(&self, start_index: usize) -> &[ConsoleMessage] {
        self.messages.get(start_index..).unwrap_or(&[])
    }
}
