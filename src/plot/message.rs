//! Messages exchanged between actors.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::{ActorId, Plot};

/// A directed or bidirectional exchange between two actors.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: ActorId,
    pub receiver: ActorId,
    pub bidirectional: bool,
    /// Free text, continuation lines joined with `\n`.
    pub content: String,
    /// Derived label, set once the content has been post-processed.
    pub title: Option<String>,
    /// Embedded metadata object (empty when the content carries none).
    pub data: Map<String, JsonValue>,
    /// 1-based line in the source text, `0` for messages created by edits.
    pub source_line: usize,
    /// Position in `Plot::messages()`.
    pub order: usize,
}

impl Message {
    /// `sender` and `receiver` must differ: the notation has no self-message.
    pub fn new(
        sender: ActorId,
        receiver: ActorId,
        bidirectional: bool,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            receiver,
            bidirectional,
            content: content.into(),
            title: None,
            data: Map::new(),
            source_line: 0,
            order: 0,
        }
    }

    #[inline]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Arrow glyph used in summaries.
    #[inline]
    pub const fn arrow(&self) -> &'static str {
        if self.bidirectional { "<->" } else { "-->" }
    }
}

// ============================================================================
// Message View
// ============================================================================

/// A message resolved against its plot.
///
/// Serializes as the binding context handed to templates:
/// `{title, sender, receiver, bidirectional, content, data}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MessageView<'a> {
    pub title: &'a str,
    pub sender: &'a str,
    pub receiver: &'a str,
    pub bidirectional: bool,
    pub content: &'a str,
    pub data: &'a Map<String, JsonValue>,
    #[serde(skip)]
    pub message: &'a Message,
}

impl<'a> MessageView<'a> {
    pub fn new(plot: &'a Plot, message: &'a Message) -> Self {
        Self {
            title: message.title(),
            sender: plot.actor_name(message.sender),
            receiver: plot.actor_name(message.receiver),
            bidirectional: message.bidirectional,
            content: &message.content,
            data: &message.data,
            message,
        }
    }
}

impl fmt::Display for MessageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}\t{}\t{}\t: {}",
            self.message.order,
            self.sender,
            self.message.arrow(),
            self.receiver,
            self.content
        )
    }
}
