//! Wire types exchanged with the remote console observer.

use crate::error::ConsoleResult;
use serde::{Deserialize, Serialize};

/// Reason reported when the observer asks for messages past the end of the log.
pub const NON_EXISTENT_INDEX: &str = "Requested non-existent console message index.";

/// Message from the console to the observer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsoleEvent {
    /// A new message was appended at `index`.
    #[serde(rename = "consoleMessageAvailable")]
    MessageAvailable { index: usize },

    /// Response to [`ConsoleRequest::GetConsoleMessages`].
    #[serde(rename = "consoleMessages")]
    Messages {
        #[serde(rename = "startIndex")]
        start_index: usize,
        #[serde(rename = "messageTypes")]
        message_types: Vec<String>,
        messages: Vec<String>,
    },

    /// The observer violated the protocol.
    #[serde(rename = "misbehavior")]
    Misbehavior { reason: String },
}

impl ConsoleEvent {
    pub fn to_json(&self) -> ConsoleResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Request from the observer to the console.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum ConsoleRequest {
    /// Pull every message from `start_index` onwards.
    #[serde(rename = "getConsoleMessages")]
    GetConsoleMessages {
        #[serde(rename = "startIndex")]
        start_index: usize,
    },

    /// Evaluate console input; the result arrives as a new message.
    #[serde(rename = "evaluateConsoleInput")]
    EvaluateConsoleInput { source: String },
}

impl ConsoleRequest {
    pub fn from_json(text: &str) -> ConsoleResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
