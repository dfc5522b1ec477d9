//! Chat messages
//!
//! A [`Message`] is immutable once appended to a conversation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::types::ConversationRecord;

/// Who authored a message.
///
/// On the wire the assistant side is `"llm"`; `"assistant"` is accepted
/// as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "llm", alias = "assistant")]
    Assistant,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::User => write!(f, "user"),
            Direction::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    direction: Direction,
}

impl Message {
    /// A message written by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::User,
        }
    }

    /// A reply from the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            direction: Direction::Assistant,
        }
    }

    /// Message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Author side.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl From<ConversationRecord> for Message {
    fn from(record: ConversationRecord) -> Self {
        Self {
            text: record.message,
            direction: record.direction,
        }
    }
}
