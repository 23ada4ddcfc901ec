//! Document mutators.
//!
//! Every mutator restores the column/order invariants before returning.
//! Positions are preconditions: an out-of-range index panics like slice
//! indexing does.

use serde_json::{Map, Value as JsonValue};

use super::{ActorId, Message, Plot};

impl Plot {
    // ========================================================================
    // Messages
    // ========================================================================

    /// Append a message at the end of the sequence.
    pub fn push_message(&mut self, mut message: Message) -> usize {
        debug_assert_ne!(message.sender, message.receiver, "self-messages cannot be rendered");
        let order = self.messages.len();
        message.order = order;
        self.messages.push(message);
        order
    }

    /// Insert a message at `position`, shifting later messages down.
    pub fn insert_message(&mut self, position: usize, message: Message) {
        debug_assert_ne!(message.sender, message.receiver, "self-messages cannot be rendered");
        self.messages.insert(position, message);
        self.renumber_from(position);
    }

    /// Remove the message at `position` and renumber the tail.
    pub fn remove_message(&mut self, position: usize) -> Message {
        let removed = self.messages.remove(position);
        self.renumber_from(position);
        removed
    }

    /// Swap two messages, reassigning both orders.
    pub fn swap_messages(&mut self, a: usize, b: usize) {
        self.messages.swap(a, b);
        self.messages[a].order = a;
        self.messages[b].order = b;
    }

    /// Move a message one position earlier. Returns `false` at the top.
    pub fn move_message_up(&mut self, position: usize) -> bool {
        assert!(position < self.messages.len(), "message {position} out of range");
        if position == 0 {
            return false;
        }
        self.swap_messages(position - 1, position);
        true
    }

    /// Move a message one position later. Returns `false` at the bottom.
    pub fn move_message_down(&mut self, position: usize) -> bool {
        assert!(position < self.messages.len(), "message {position} out of range");
        if position + 1 == self.messages.len() {
            return false;
        }
        self.swap_messages(position, position + 1);
        true
    }

    pub fn set_message_title(&mut self, position: usize, title: impl Into<String>) {
        self.messages[position].title = Some(title.into());
    }

    pub fn set_message_content(&mut self, position: usize, content: impl Into<String>) {
        self.messages[position].content = content.into();
    }

    pub fn set_message_data(&mut self, position: usize, data: Map<String, JsonValue>) {
        self.messages[position].data = data;
    }

    /// Point a message at new actors. Returns `false` if nothing changed.
    pub fn set_message_endpoints(
        &mut self,
        position: usize,
        sender: ActorId,
        receiver: ActorId,
        bidirectional: bool,
    ) -> bool {
        debug_assert_ne!(sender, receiver, "self-messages cannot be rendered");
        let message = &mut self.messages[position];
        if (message.sender, message.receiver, message.bidirectional) == (sender, receiver, bidirectional) {
            return false;
        }
        message.sender = sender;
        message.receiver = receiver;
        message.bidirectional = bidirectional;
        true
    }

    fn renumber_from(&mut self, start: usize) {
        for (order, message) in self.messages.iter_mut().enumerate().skip(start) {
            message.order = order;
        }
    }

    // ========================================================================
    // Actors
    // ========================================================================

    /// Move the actor in `column` one column to the left.
    ///
    /// Returns `false` (and changes nothing) when the actor already sits in
    /// the first column.
    pub fn move_actor_left(&mut self, column: usize) -> bool {
        assert!(column < self.actors.len(), "column {column} out of range");
        if column == 0 {
            return false;
        }
        self.swap_actors(column - 1);
        true
    }

    /// Move the actor in `column` one column to the right.
    ///
    /// Returns `false` (and changes nothing) when the actor already sits in
    /// the last column.
    pub fn move_actor_right(&mut self, column: usize) -> bool {
        assert!(column < self.actors.len(), "column {column} out of range");
        if column + 1 == self.actors.len() {
            return false;
        }
        self.swap_actors(column);
        true
    }

    /// Swap the actors in `left` and `left + 1`.
    fn swap_actors(&mut self, left: usize) {
        self.actors.swap(left, left + 1);
        self.actors[left].column = left;
        self.actors[left + 1].column = left + 1;
    }

    /// Attach a metadata entry to the actor in `column`.
    pub fn set_actor_data(&mut self, column: usize, key: impl Into<String>, value: JsonValue) {
        self.actors[column]
            .data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plot_with(actors: &[&str], messages: usize) -> Plot {
        let mut plot = Plot::new("edit", "edit.plot");
        let ids: Vec<_> = actors.iter().map(|name| plot.add_actor(*name)).collect();
        for i in 0..messages {
            plot.push_message(Message::new(ids[0], ids[1], false, format!("m{i}")));
        }
        plot
    }

    fn contents(plot: &Plot) -> Vec<&str> {
        plot.messages().iter().map(|m| m.content.as_str()).collect()
    }

    #[test]
    fn test_push_assigns_order() {
        let plot = plot_with(&["A", "B"], 3);
        let orders: Vec<_> = plot.messages().iter().map(|m| m.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_remove_renumbers_tail() {
        let mut plot = plot_with(&["A", "B"], 5);
        let removed = plot.remove_message(2);
        assert_eq!(removed.content, "m2");
        assert_eq!(contents(&plot), vec!["m0", "m1", "m3", "m4"]);
        assert!(plot.is_consistent());
    }

    #[test]
    fn test_remove_every_position() {
        for k in 0..4 {
            let mut plot = plot_with(&["A", "B"], 4);
            plot.remove_message(k);
            assert_eq!(plot.messages().len(), 3);
            assert!(plot.is_consistent(), "inconsistent after removing {k}");
        }
    }

    #[test]
    fn test_insert_renumbers_tail() {
        let mut plot = plot_with(&["A", "B"], 3);
        let (a, b) = (plot.actors()[0].id, plot.actors()[1].id);
        plot.insert_message(1, Message::new(b, a, true, "new"));
        assert_eq!(contents(&plot), vec!["m0", "new", "m1", "m2"]);
        assert!(plot.is_consistent());
    }

    #[test]
    fn test_move_message_up_and_down() {
        let mut plot = plot_with(&["A", "B"], 3);
        assert!(plot.move_message_up(2));
        assert_eq!(contents(&plot), vec!["m0", "m2", "m1"]);
        assert!(plot.move_message_down(0));
        assert_eq!(contents(&plot), vec!["m2", "m0", "m1"]);
        assert!(plot.is_consistent());
    }

    #[test]
    fn test_move_message_at_boundary() {
        let mut plot = plot_with(&["A", "B"], 2);
        assert!(!plot.move_message_up(0));
        assert!(!plot.move_message_down(1));
        assert_eq!(contents(&plot), vec!["m0", "m1"]);
    }

    #[test]
    fn test_move_actor_keeps_message_endpoints() {
        let mut plot = plot_with(&["A", "B", "C"], 1);
        let sender = plot.messages()[0].sender;
        assert!(plot.move_actor_right(0));

        let names: Vec<_> = plot.actors().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert!(plot.is_consistent());
        assert_eq!(plot.actor_name(sender), "A");
        assert_eq!(plot.column_of(sender), Some(1));
    }

    #[test]
    fn test_move_actor_at_boundary() {
        let mut plot = plot_with(&["A", "B"], 0);
        assert!(!plot.move_actor_left(0));
        assert!(!plot.move_actor_right(1));
        assert!(plot.move_actor_left(1));
        assert_eq!(plot.actors()[0].name, "B");
    }

    #[test]
    fn test_single_actor_cannot_move() {
        let mut plot = Plot::new("one", "one.plot");
        plot.add_actor("Solo");
        assert!(!plot.move_actor_left(0));
        assert!(!plot.move_actor_right(0));
    }

    #[test]
    fn test_set_actor_data() {
        let mut plot = plot_with(&["A", "B"], 0);
        plot.set_actor_data(1, "color", json!("red"));
        plot.set_actor_data(1, "weight", json!(2));
        assert_eq!(plot.actors()[1].get_data("color"), Some(&json!("red")));
        assert_eq!(plot.actors()[1].get_data("weight"), Some(&json!(2)));
        assert!(plot.actors()[0].data.is_none());
    }

    #[test]
    fn test_field_edits() {
        let mut plot = plot_with(&["A", "B"], 1);
        plot.set_message_title(0, "PING");
        plot.set_message_content(0, "again");
        let mut data = Map::new();
        data.insert("n".into(), json!(1));
        plot.set_message_data(0, data);

        let message = &plot.messages()[0];
        assert_eq!(message.title(), "PING");
        assert_eq!(message.content, "again");
        assert_eq!(message.data["n"], json!(1));
    }

    #[test]
    fn test_set_message_endpoints() {
        let mut plot = plot_with(&["A", "B", "C"], 2);
        let (a, c) = (plot.actors()[0].id, plot.actors()[2].id);

        assert!(plot.set_message_endpoints(1, c, a, true));
        let message = &plot.messages()[1];
        assert_eq!(plot.actor_name(message.sender), "C");
        assert_eq!(plot.actor_name(message.receiver), "A");
        assert!(message.bidirectional);
        assert!(!plot.set_message_endpoints(1, c, a, true));
        assert!(plot.is_consistent());
    }

    #[test]
    #[should_panic(expected = "self-messages")]
    fn test_self_message_is_rejected() {
        let mut plot = plot_with(&["A", "B"], 0);
        let a = plot.actors()[0].id;
        plot.push_message(Message::new(a, a, false, "loop"));
    }

    #[test]
    #[should_panic]
    fn test_remove_out_of_range_panics() {
        let mut plot = plot_with(&["A", "B"], 1);
        plot.remove_message(5);
    }
}
