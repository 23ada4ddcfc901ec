//! Diagram participants.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Stable actor handle.
///
/// Assigned once when the actor is created and never reused within a plot,
/// so messages keep pointing at the same participant when columns move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActorId(pub(super) u32);

impl ActorId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// A named participant occupying one column of the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    #[serde(skip)]
    pub id: ActorId,
    pub name: String,
    /// 0-based column, always equal to the position in `Plot::actors()`.
    pub column: usize,
    /// Free-form metadata attached by editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, JsonValue>>,
}

impl Actor {
    pub(super) fn new(id: ActorId, name: impl Into<String>, column: usize) -> Self {
        Self {
            id,
            name: name.into(),
            column,
            data: None,
        }
    }

    /// Look up a metadata value.
    pub fn get_data(&self, key: &str) -> Option<&JsonValue> {
        self.data.as_ref()?.get(key)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.column)
    }
}
