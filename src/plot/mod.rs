//! In-memory plot document.
//!
//! A [`Plot`] owns an ordered actor sequence and an ordered message
//! sequence. Two invariants hold between any two public calls:
//!
//! - actor `column` equals the actor's position, columns are `0..n-1`
//! - message `order` equals the message's position
//!
//! Messages reference actors through stable [`ActorId`] handles, so moving
//! actors between columns never rebinds a message's endpoints.
//!
//! # Module Structure
//!
//! - `actor`   - `Actor`, `ActorId`
//! - `message` - `Message`, `MessageView` (template binding context)
//! - `edit`    - mutators used by editing front ends

mod actor;
mod edit;
mod message;

pub use actor::{Actor, ActorId};
pub use message::{Message, MessageView};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::parser::{self, ParseError};

/// Source of unique plot identifiers.
static NEXT_PLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a plot instance within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotId(u64);

impl PlotId {
    fn next() -> Self {
        Self(NEXT_PLOT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A parsed sequence-diagram document.
#[derive(Debug, Clone)]
pub struct Plot {
    id: PlotId,
    pub title: String,
    /// Where the text came from (usually a file name).
    pub source: String,
    actors: Vec<Actor>,
    messages: Vec<Message>,
    next_actor: u32,
}

impl Plot {
    /// Create an empty plot.
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: PlotId::next(),
            title: title.into(),
            source: source.into(),
            actors: Vec::new(),
            messages: Vec::new(),
            next_actor: 0,
        }
    }

    /// Populate this plot from raw text.
    ///
    /// Replaces any actors and messages already present. On error the plot
    /// is left empty.
    pub fn parse(&mut self, raw: &str) -> Result<(), ParseError> {
        self.actors.clear();
        self.messages.clear();
        let result = parser::parse_into(self, raw);
        if result.is_err() {
            self.actors.clear();
            self.messages.clear();
        }
        result
    }

    #[inline]
    pub const fn id(&self) -> PlotId {
        self.id
    }

    #[inline]
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append a new actor in the next free column.
    pub fn add_actor(&mut self, name: impl Into<String>) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;
        let column = self.actors.len();
        self.actors.push(Actor::new(id, name, column));
        id
    }

    /// Resolve a handle to its actor.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    /// Actor name for a handle, empty if the handle is unknown.
    pub fn actor_name(&self, id: ActorId) -> &str {
        self.actor(id).map_or("", |actor| actor.name.as_str())
    }

    /// Column currently occupied by an actor.
    pub fn column_of(&self, id: ActorId) -> Option<usize> {
        self.actor(id).map(|actor| actor.column)
    }

    pub fn actor_by_name(&self, name: &str) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    /// Resolve a message against this plot.
    pub fn view<'a>(&'a self, message: &'a Message) -> MessageView<'a> {
        MessageView::new(self, message)
    }

    /// Iterate all messages as resolved views.
    pub fn views(&self) -> impl Iterator<Item = MessageView<'_>> {
        self.messages.iter().map(|message| self.view(message))
    }

    pub(crate) fn last_message_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut()
    }

    pub(crate) fn messages_mut(&mut self) -> &mut [Message] {
        &mut self.messages
    }

    /// Check the column and order invariants.
    pub fn is_consistent(&self) -> bool {
        let columns = self
            .actors
            .iter()
            .enumerate()
            .all(|(i, actor)| actor.column == i);
        let orders = self
            .messages
            .iter()
            .enumerate()
            .all(|(i, message)| message.order == i);
        columns && orders
    }
}
