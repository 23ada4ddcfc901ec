//! `seqplot edit`: apply one mutation and render the result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value as JsonValue};

use super::args::EditOp;
use super::common::{read_plot, write_output};
use crate::config::PlotConfig;
use crate::log;
use crate::parser::is_message_line;
use crate::plot::{ActorId, Message, Plot};

pub fn run_edit(file: &Path, op: &EditOp, write: bool, config: &PlotConfig) -> Result<()> {
    let mut plot = read_plot(file, config)?;
    if !apply(&mut plot, op)? {
        log!("edit"; "{:?} changed nothing", op);
    }
    let text = config.renderer().render(&plot);

    if write {
        fs::write(file, &text).with_context(|| format!("failed to write {}", file.display()))?;
        log!("edit"; "updated {}", file.display());
        Ok(())
    } else {
        write_output("edit", &text, None)
    }
}

/// Apply `op`, returning whether the plot changed.
///
/// Out-of-range positions are reported as errors rather than reaching the
/// mutators, which treat them as caller bugs. Values the renderer could not
/// write back unchanged are rejected before anything is modified.
pub fn apply(plot: &mut Plot, op: &EditOp) -> Result<bool> {
    match op {
        EditOp::NewMessage { from, to, title, content, position, both } => {
            let (sender, receiver) = endpoints(plot, *from, *to)?;
            check_title(title)?;
            let content = content.as_deref().unwrap_or_default();
            check_content(content)?;

            let mut message = Message::new(sender, receiver, *both, content);
            message.title = Some(title.clone());
            match *position {
                Some(position) if position > plot.messages().len() => bail!(
                    "cannot insert at {position}, the plot has {} messages",
                    plot.messages().len()
                ),
                Some(position) => plot.insert_message(position, message),
                None => {
                    plot.push_message(message);
                }
            }
        }
        EditOp::DeleteMessage { order } => {
            plot.remove_message(message_at(plot, *order)?);
        }
        EditOp::MessageUp { order } => return Ok(plot.move_message_up(message_at(plot, *order)?)),
        EditOp::MessageDown { order } => {
            return Ok(plot.move_message_down(message_at(plot, *order)?));
        }
        EditOp::SwapMessages { a, b } => {
            let (a, b) = (message_at(plot, *a)?, message_at(plot, *b)?);
            plot.swap_messages(a, b);
            return Ok(a != b);
        }
        EditOp::ActorLeft { column } => return Ok(plot.move_actor_left(actor_at(plot, *column)?)),
        EditOp::ActorRight { column } => {
            return Ok(plot.move_actor_right(actor_at(plot, *column)?));
        }
        EditOp::SetEndpoints { order, from, to, both } => {
            let order = message_at(plot, *order)?;
            let (sender, receiver) = endpoints(plot, *from, *to)?;
            return Ok(plot.set_message_endpoints(order, sender, receiver, *both));
        }
        EditOp::SetTitle { order, title } => {
            let order = message_at(plot, *order)?;
            check_title(title)?;
            plot.set_message_title(order, title.as_str());
        }
        EditOp::SetContent { order, content } => {
            let order = message_at(plot, *order)?;
            if plot.messages()[order].data.is_empty() {
                check_content(content)?;
            }
            plot.set_message_content(order, content.as_str());
        }
        EditOp::SetData { order, json } => {
            let order = message_at(plot, *order)?;
            let data: Map<String, JsonValue> =
                serde_json::from_str(json).with_context(|| format!("invalid JSON object `{json}`"))?;
            check_data(&data)?;
            if data.is_empty() {
                check_content(&plot.messages()[order].content)?;
            }
            plot.set_message_data(order, data);
        }
        EditOp::ActorData { column, key, value } => {
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| JsonValue::String(value.clone()));
            plot.set_actor_data(actor_at(plot, *column)?, key.as_str(), value);
        }
    }
    Ok(true)
}

fn message_at(plot: &Plot, order: usize) -> Result<usize> {
    let len = plot.messages().len();
    if order >= len {
        bail!("no message {order}, the plot has {len} (orders start at 0)");
    }
    Ok(order)
}

fn actor_at(plot: &Plot, column: usize) -> Result<usize> {
    let len = plot.actors().len();
    if column >= len {
        bail!("no actor column {column}, the plot has {len} (columns start at 0)");
    }
    Ok(column)
}

/// Sender and receiver ids for two distinct columns.
fn endpoints(plot: &Plot, from: usize, to: usize) -> Result<(ActorId, ActorId)> {
    let (from, to) = (actor_at(plot, from)?, actor_at(plot, to)?);
    if from == to {
        bail!("a message needs two different actors, got column {from} twice");
    }
    Ok((plot.actors()[from].id, plot.actors()[to].id))
}

/// A title is one word, and a brace would start the data object.
fn check_title(title: &str) -> Result<()> {
    if title.split_whitespace().count() != 1 {
        bail!("title must be a single word, got `{title}`");
    }
    if title.contains(['{', '}']) {
        bail!("title must not contain braces, got `{title}`");
    }
    Ok(())
}

/// Content of a message without data, as it must read back.
fn check_content(content: &str) -> Result<()> {
    if content.contains('{') {
        bail!("content of a message without data must not contain `{{`");
    }
    let multiline = content.contains('\n');
    for (i, line) in content.lines().enumerate() {
        let n = i + 1;
        if multiline && line.is_empty() {
            bail!("content line {n} is blank");
        }
        if i == 0 {
            continue;
        }
        if line.starts_with('#') {
            bail!("content line {n} starts with `#` and would be skipped as a comment");
        }
        if is_message_line(&format!("| {line}")) {
            bail!("content line {n} would be read as a message line");
        }
    }
    Ok(())
}

/// The compact JSON must end at its first `}`.
fn check_data(data: &Map<String, JsonValue>) -> Result<()> {
    let json = serde_json::to_string(data)?;
    if json.find('}') != Some(json.len() - 1) {
        bail!("data cannot hold nested objects or `}}` inside strings, got `{json}`");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde_json::json;

    const TEXT: &str = "\
A B C
|--->|    | ONE
|    |<-->| TWO
|<--------| THREE";

    fn titles(plot: &Plot) -> Vec<&str> {
        plot.messages().iter().map(|m| m.title()).collect()
    }

    fn sample() -> Plot {
        parse("t", "t.plot", TEXT).unwrap()
    }

    #[test]
    fn test_delete_renumbers() {
        let mut plot = sample();
        assert!(apply(&mut plot, &EditOp::DeleteMessage { order: 0 }).unwrap());
        assert_eq!(titles(&plot), vec!["TWO", "THREE"]);
        assert_eq!(plot.messages()[1].order, 1);
    }

    #[test]
    fn test_message_moves() {
        let mut plot = sample();
        assert!(!apply(&mut plot, &EditOp::MessageUp { order: 0 }).unwrap());
        assert!(apply(&mut plot, &EditOp::MessageDown { order: 0 }).unwrap());
        assert_eq!(titles(&plot), vec!["TWO", "ONE", "THREE"]);
        assert!(apply(&mut plot, &EditOp::SwapMessages { a: 0, b: 2 }).unwrap());
        assert_eq!(titles(&plot), vec!["THREE", "ONE", "TWO"]);
    }

    #[test]
    fn test_actor_moves_keep_endpoints() {
        let mut plot = sample();
        assert!(!apply(&mut plot, &EditOp::ActorLeft { column: 0 }).unwrap());
        assert!(apply(&mut plot, &EditOp::ActorRight { column: 0 }).unwrap());

        let names: Vec<_> = plot.actors().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        let first = &plot.messages()[0];
        assert_eq!(plot.actor_name(first.sender), "A");
        assert_eq!(plot.actor_name(first.receiver), "B");
    }

    #[test]
    fn test_set_fields() {
        let mut plot = sample();
        apply(&mut plot, &EditOp::SetTitle { order: 1, title: "PONG".into() }).unwrap();
        apply(&mut plot, &EditOp::SetContent { order: 1, content: "back".into() }).unwrap();
        apply(&mut plot, &EditOp::SetData { order: 2, json: "{\"n\": 1}".into() }).unwrap();
        apply(
            &mut plot,
            &EditOp::ActorData { column: 2, key: "role".into(), value: "db".into() },
        )
        .unwrap();
        apply(
            &mut plot,
            &EditOp::ActorData { column: 2, key: "port".into(), value: "5432".into() },
        )
        .unwrap();

        assert_eq!(plot.messages()[1].title(), "PONG");
        assert_eq!(plot.messages()[1].content, "back");
        assert_eq!(plot.messages()[2].data["n"], json!(1));
        let actor = &plot.actors()[2];
        assert_eq!(actor.get_data("role"), Some(&json!("db")));
        assert_eq!(actor.get_data("port"), Some(&json!(5432)));
    }

    #[test]
    fn test_out_of_range_is_error() {
        let mut plot = sample();
        assert!(apply(&mut plot, &EditOp::DeleteMessage { order: 3 }).is_err());
        assert!(apply(&mut plot, &EditOp::ActorRight { column: 3 }).is_err());
        assert!(apply(&mut plot, &EditOp::SetTitle { order: 0, title: "TWO WORDS".into() }).is_err());
        assert!(apply(&mut plot, &EditOp::SetData { order: 0, json: "[1]".into() }).is_err());
        assert_eq!(titles(&plot), vec!["ONE", "TWO", "THREE"]);
    }

    fn reparsed(plot: &Plot) -> Plot {
        parse("t", "t.plot", &crate::render::render(plot)).unwrap()
    }

    fn new_message(from: usize, to: usize, title: &str, position: Option<usize>) -> EditOp {
        EditOp::NewMessage {
            from,
            to,
            title: title.into(),
            content: None,
            position,
            both: false,
        }
    }

    #[test]
    fn test_new_message_round_trip() {
        let mut plot = sample();
        let op = EditOp::NewMessage {
            from: 2,
            to: 0,
            title: "HELLO".into(),
            content: Some("hi there".into()),
            position: Some(1),
            both: false,
        };
        assert!(apply(&mut plot, &op).unwrap());
        assert!(apply(&mut plot, &new_message(0, 1, "BYE", None)).unwrap());
        assert_eq!(titles(&plot), vec!["ONE", "HELLO", "TWO", "THREE", "BYE"]);
        assert!(plot.is_consistent());

        let plot = reparsed(&plot);
        assert_eq!(titles(&plot), vec!["ONE", "HELLO", "TWO", "THREE", "BYE"]);
        let hello = &plot.messages()[1];
        assert_eq!(plot.actor_name(hello.sender), "C");
        assert_eq!(plot.actor_name(hello.receiver), "A");
        assert!(!hello.bidirectional);
        assert_eq!(hello.content, "hi there");
    }

    #[test]
    fn test_new_message_rejections() {
        let mut plot = sample();
        assert!(apply(&mut plot, &new_message(1, 1, "SELF", None)).is_err());
        assert!(apply(&mut plot, &new_message(0, 3, "FAR", None)).is_err());
        assert!(apply(&mut plot, &new_message(0, 1, "LATE", Some(4))).is_err());
        assert!(apply(&mut plot, &new_message(0, 1, "{X", None)).is_err());
        assert_eq!(plot.messages().len(), 3);

        assert!(apply(&mut plot, &new_message(0, 1, "LAST", Some(3))).unwrap());
        assert_eq!(titles(&plot), vec!["ONE", "TWO", "THREE", "LAST"]);
    }

    #[test]
    fn test_set_endpoints_round_trip() {
        let mut plot = sample();
        let op = EditOp::SetEndpoints { order: 0, from: 2, to: 1, both: true };
        assert!(apply(&mut plot, &op).unwrap());
        assert!(!apply(&mut plot, &op).unwrap());
        assert!(apply(&mut plot, &EditOp::SetEndpoints { order: 0, from: 0, to: 0, both: false }).is_err());

        let plot = reparsed(&plot);
        let first = &plot.messages()[0];
        assert_eq!(plot.actor_name(first.sender), "B");
        assert_eq!(plot.actor_name(first.receiver), "C");
        assert!(first.bidirectional);
        assert_eq!(first.title(), "ONE");
    }

    #[test]
    fn test_braces_rejected_without_data() {
        let mut plot = sample();
        let set_content = |content: &str| EditOp::SetContent { order: 0, content: content.into() };
        assert!(apply(&mut plot, &EditOp::SetTitle { order: 0, title: "A{B".into() }).is_err());
        assert!(apply(&mut plot, &set_content("see {x")).is_err());
        assert!(apply(&mut plot, &set_content("ok\nthen {x")).is_err());
        assert_eq!(plot.messages()[0].content, "");

        // Data replaces the content on output, so braces are harmless there.
        apply(&mut plot, &EditOp::SetData { order: 2, json: "{\"n\": 1}".into() }).unwrap();
        assert!(apply(&mut plot, &EditOp::SetContent { order: 2, content: "see {x".into() }).unwrap());
        assert!(apply(&mut plot, &EditOp::SetData { order: 2, json: "{}".into() }).is_err());
    }

    #[test]
    fn test_content_lines_that_would_not_read_back() {
        let mut plot = sample();
        let set_content = |content: &str| EditOp::SetContent { order: 1, content: content.into() };
        assert!(apply(&mut plot, &set_content("first\n# note")).is_err());
        assert!(apply(&mut plot, &set_content("first\n\nthird")).is_err());
        assert!(apply(&mut plot, &set_content("\nsecond")).is_err());
        assert!(apply(&mut plot, &set_content("first\nx-y | z")).is_err());

        assert!(apply(&mut plot, &set_content("first # not a comment\nsecond | line")).unwrap());
        let plot = reparsed(&plot);
        assert_eq!(plot.messages()[1].content, "first # not a comment\nsecond | line");
    }

    #[test]
    fn test_nested_data_rejected() {
        let mut plot = sample();
        let set_data = |json: &str| EditOp::SetData { order: 0, json: json.into() };
        assert!(apply(&mut plot, &set_data("{\"a\": {\"b\": 1}}")).is_err());
        assert!(apply(&mut plot, &set_data("{\"a\": \"x}\"}")).is_err());
        assert!(plot.messages()[0].data.is_empty());

        assert!(apply(&mut plot, &set_data("{\"a\": [1, 2], \"b\": \"{\"}")).unwrap());
        let plot = reparsed(&plot);
        assert_eq!(plot.messages()[0].data["a"], json!([1, 2]));
    }

    #[test]
    fn test_run_edit_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("flow.plot");
        fs::write(&file, TEXT).unwrap();

        run_edit(&file, &EditOp::DeleteMessage { order: 1 }, true, &PlotConfig::default()).unwrap();
        let plot = parse("t", "t.plot", &fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(titles(&plot), vec!["ONE", "THREE"]);
    }
}
