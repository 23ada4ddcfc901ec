//! Plot → ASCII notation.
//!
//! The output is what the parser reads back: a header row, a separator row,
//! then one arrow row per message followed by one separator row per extra
//! content line.
//!
//! ```text
//! Client          Server          Database
//! |               |               |
//! |-------------->|               | LOGIN {"user":"alice"}
//! |               |<------------->| QUERY users
//! |               |               | SELECT * FROM users
//! ```

use std::fmt::Write as _;

use crate::plot::{Message, Plot};

/// Default lower bound for the column width.
pub const MIN_COLUMN_WIDTH: usize = 15;

/// Narrowest column that still fits a both-ended arrow between pipes.
pub const MIN_RENDER_WIDTH: usize = 3;

/// Render a plot with the default column width.
pub fn render(plot: &Plot) -> String {
    Renderer::default().render(plot)
}

/// Renderer settings.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Lower bound for the gap between two actor pipes.
    pub min_width: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            min_width: MIN_COLUMN_WIDTH,
        }
    }
}

impl Renderer {
    pub const fn new(min_width: usize) -> Self {
        Self { min_width }
    }

    pub fn render(&self, plot: &Plot) -> String {
        let width = self.column_width(plot);
        let separator = separator_row(plot.actors().len(), width);
        let mut out = String::new();

        out.push_str(header_row(plot, width).trim_end());
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');

        for message in plot.messages() {
            let (first, rest) = payload_lines(message);
            let _ = writeln!(out, "{} {first}", arrow_row(plot, message, width));
            for line in rest {
                let _ = writeln!(out, "{separator} {line}");
            }
        }
        out
    }

    /// Uniform gap between pipes: the longest name or `min_width`, never
    /// below [`MIN_RENDER_WIDTH`].
    fn column_width(&self, plot: &Plot) -> usize {
        plot.actors()
            .iter()
            .map(|actor| actor.name.chars().count())
            .max()
            .unwrap_or_default()
            .max(self.min_width)
            .max(MIN_RENDER_WIDTH)
    }
}

fn header_row(plot: &Plot, width: usize) -> String {
    let cell = width + 1;
    plot.actors()
        .iter()
        .map(|actor| format!("{:<cell$}", actor.name))
        .collect()
}

fn separator_row(columns: usize, width: usize) -> String {
    vec!["|"; columns].join(&" ".repeat(width))
}

/// Arrow track for one message.
///
/// The cell between pipes `k` and `k + 1` is the character at pipe `k`
/// followed by `width` fill characters. Pipes strictly inside the span are
/// drawn as dashes so the scanner counts only the outer columns.
fn arrow_row(plot: &Plot, message: &Message, width: usize) -> String {
    let columns = plot.actors().len();
    let sender = plot.column_of(message.sender).unwrap_or_default();
    let receiver = plot.column_of(message.receiver).unwrap_or_default();
    let (left, right) = (sender.min(receiver), sender.max(receiver));

    // Unused heads become dashes.
    let (left_head, right_head) = match (message.bidirectional, sender <= receiver) {
        (true, _) => ('<', '>'),
        (false, true) => ('-', '>'),
        (false, false) => ('<', '-'),
    };

    let mut row = String::with_capacity(columns * (width + 1));
    for k in 0..columns.saturating_sub(1) {
        if k < left || k >= right {
            row.push('|');
            row.extend(std::iter::repeat_n(' ', width));
            continue;
        }
        let starts = k == left;
        let ends = k + 1 == right;
        row.push(if starts { '|' } else { '-' });
        let dashes = width - usize::from(starts) - usize::from(ends);
        if starts {
            row.push(left_head);
        }
        row.extend(std::iter::repeat_n('-', dashes));
        if ends {
            row.push(right_head);
        }
    }
    if columns > 0 {
        row.push('|');
    }
    row
}

/// Text after the arrow and the lines that follow on separator rows.
///
/// Data is written as compact JSON in place of the content. A message with
/// no title, data or content still gets `{}` so its row carries a payload.
fn payload_lines(message: &Message) -> (String, Vec<&str>) {
    let mut lines = message.content.lines();
    let text = if message.data.is_empty() {
        lines.next().unwrap_or_default()
    } else {
        ""
    };
    let inline_data =
        !message.data.is_empty() || (message.title().is_empty() && text.is_empty());

    let body = if inline_data {
        serde_json::to_string(&message.data).unwrap_or_default()
    } else {
        text.to_string()
    };
    let first = [message.title(), body.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let rest = if inline_data { Vec::new() } else { lines.collect() };
    (first, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::plot::ActorId;
    use serde_json::json;

    fn plot_of(header: &str) -> Plot {
        let mut plot = Plot::new("r", "r.plot");
        for name in header.split_whitespace() {
            plot.add_actor(name);
        }
        plot
    }

    fn id(plot: &Plot, name: &str) -> ActorId {
        plot.actor_by_name(name).unwrap().id
    }

    fn titled(mut message: Message, title: &str) -> Message {
        message.title = Some(title.to_string());
        message
    }

    #[test]
    fn test_header_and_separator() {
        let plot = plot_of("A B");
        let text = Renderer::new(4).render(&plot);
        assert_eq!(text, "A    B\n|    |\n");
    }

    #[test]
    fn test_width_grows_with_long_names() {
        let plot = plot_of("Short AVeryLongActorName");
        let text = render(&plot);
        let separator = text.lines().nth(1).unwrap();
        assert_eq!(separator.len(), "AVeryLongActorName".len() + 2);
    }

    #[test]
    fn test_arrow_cells() {
        let mut plot = plot_of("A B C D");
        let (a, b, c, d) = (id(&plot, "A"), id(&plot, "B"), id(&plot, "C"), id(&plot, "D"));
        plot.push_message(titled(Message::new(b, d, false, ""), "X"));
        plot.push_message(titled(Message::new(c, a, false, ""), "Y"));
        plot.push_message(titled(Message::new(a, b, true, ""), "Z"));

        let text = Renderer::new(4).render(&plot);
        let rows: Vec<_> = text.lines().skip(2).collect();
        assert_eq!(rows[0], "|    |-------->| X");
        assert_eq!(rows[1], "|<--------|    | Y");
        assert_eq!(rows[2], "|<-->|    |    | Z");
    }

    #[test]
    fn test_data_replaces_content() {
        let mut plot = plot_of("A B");
        let (a, b) = (id(&plot, "A"), id(&plot, "B"));
        let mut message = titled(Message::new(a, b, false, "ignored"), "STATUS");
        message.data = json!({"ok": true}).as_object().unwrap().clone();
        plot.push_message(message);

        let text = Renderer::new(4).render(&plot);
        assert_eq!(text.lines().nth(2), Some("|--->| STATUS {\"ok\":true}"));
    }

    #[test]
    fn test_multiline_content_on_separator_rows() {
        let mut plot = plot_of("A B");
        let (a, b) = (id(&plot, "A"), id(&plot, "B"));
        plot.push_message(titled(Message::new(b, a, false, "one\ntwo\nthree"), "NOTE"));

        let text = Renderer::new(4).render(&plot);
        let rows: Vec<_> = text.lines().skip(2).collect();
        assert_eq!(rows, vec!["|<---| NOTE one", "|    | two", "|    | three"]);
    }

    #[test]
    fn test_empty_message_keeps_payload() {
        let plot = parse("t", "t.plot", "A B\n|--->| {}").unwrap();
        let text = Renderer::new(4).render(&plot);
        assert_eq!(text.lines().nth(2), Some("|--->| {}"));

        let reparsed = parse("t", "t.plot", &text).unwrap();
        assert_eq!(reparsed.messages().len(), 1);
        assert_eq!(reparsed.messages()[0].title(), "");
        assert!(reparsed.messages()[0].data.is_empty());
    }

    #[test]
    fn test_width_floor() {
        let mut plot = plot_of("A B");
        let (a, b) = (id(&plot, "A"), id(&plot, "B"));
        plot.push_message(titled(Message::new(a, b, true, ""), "X"));

        let text = Renderer::new(0).render(&plot);
        assert_eq!(text.lines().nth(2), Some("|<->| X"));
        assert_eq!(parse("t", "t.plot", &text).unwrap().messages().len(), 1);
    }

    #[test]
    fn test_render_empty_plot() {
        let plot = Plot::new("empty", "empty.plot");
        assert_eq!(render(&plot), "\n\n");
    }

    // ------------------------------------------------------------------------
    // Round trip
    // ------------------------------------------------------------------------

    const SOURCE: &str = "\
Client  Server  Database  Cache
|       |       |         |
|------>|       |         | LOGIN {\"user\": \"alice\", \"tries\": 2}
|       |<----->|         | QUERY users
|       |       |         | SELECT *
|       |       |         | FROM users
|       |<--------------->| WARM
|<--------------|         | PUSH sync now
|       |<------|         | ACK
|-----------------------> | BROADCAST everyone
|       |------>|         | {}";

    fn assert_same_semantics(a: &Plot, b: &Plot) {
        let names = |p: &Plot| p.actors().iter().map(|x| x.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(a), names(b));
        assert_eq!(a.messages().len(), b.messages().len());
        for (x, y) in a.messages().iter().zip(b.messages()) {
            assert_eq!(a.actor_name(x.sender), b.actor_name(y.sender));
            assert_eq!(a.actor_name(x.receiver), b.actor_name(y.receiver));
            assert_eq!(x.bidirectional, y.bidirectional);
            assert_eq!(x.title(), y.title());
            assert_eq!(x.data, y.data);
            assert_eq!(x.order, y.order);
        }
    }

    #[test]
    fn test_round_trip() {
        let original = parse("t", "t.plot", SOURCE).unwrap();
        let rendered = render(&original);
        let reparsed = parse("t", "t.plot", &rendered).unwrap();
        assert_same_semantics(&original, &reparsed);

        // Content without data survives too.
        let query = &reparsed.messages()[1];
        assert_eq!(query.content, "users\nSELECT *\nFROM users");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let original = parse("t", "t.plot", SOURCE).unwrap();
        let once = render(&original);
        let twice = render(&parse("t", "t.plot", &once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_round_trip_after_edits() {
        let mut plot = parse("t", "t.plot", SOURCE).unwrap();
        plot.move_actor_right(0);
        plot.remove_message(2);
        plot.move_message_up(3);

        let reparsed = parse("t", "t.plot", &render(&plot)).unwrap();
        assert_same_semantics(&plot, &reparsed);
    }
}
