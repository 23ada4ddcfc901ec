//! Plot text parser.
//!
//! # Format
//!
//! ```text
//! Client          Server          Database
//! |               |               |
//! |-------------->|               | LOGIN {"user": "alice"}
//! |               |<------------->| QUERY users
//! |               |               | SELECT * FROM users
//! |<--------------|               | OK
//! ```
//!
//! - line 1 names the actors, one column each
//! - a line shaped like `|…-…|` is a message line
//! - any other line after the first message continues the last message
//!
//! # Module Structure
//!
//! - `scan`     - single-pass column scanner
//! - `metadata` - title / JSON extraction after all lines are read
//! - `error`    - `ParseError` and caret diagnostics

mod error;
mod metadata;
mod scan;


pub use error::{ParseError, ParseErrorKind};
pub use scan::Direction;

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::debug;
use crate::plot::{Message, Plot};

/// Actor names in the header line.
static HEADER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_-]+").unwrap());

/// Generic shape of a message track.
static MESSAGE_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|.*-.*\|.*").unwrap());

/// Parse raw text into a new plot.
pub fn parse(
    title: impl Into<String>,
    source: impl Into<String>,
    raw: &str,
) -> Result<Plot, ParseError> {
    let mut plot = Plot::new(title, source);
    plot.parse(raw)?;
    Ok(plot)
}

/// Populate an empty plot from raw text.
pub(crate) fn parse_into(plot: &mut Plot, raw: &str) -> Result<(), ParseError> {
    let lines: Vec<&str> = raw.lines().collect();
    let Some((header, body)) = lines.split_first() else {
        return Ok(());
    };

    parse_header(plot, header).map_err(|err| err.on_line(1, header))?;

    for (index, line) in body.iter().enumerate() {
        let line_no = index + 2;
        if let Err(err) = parse_line(plot, line, line_no) {
            debug!("parse"; "{}:{} {}", plot.source, line_no, err);
            return Err(err.on_line(line_no, line));
        }
    }

    for message in plot.messages_mut() {
        let line_no = message.source_line;
        metadata::finalize(message).map_err(|err| {
            let line = lines.get(line_no.wrapping_sub(1)).copied().unwrap_or_default();
            err.on_line(line_no, line)
        })?;
    }

    debug!(
        "parse";
        "{}: {} actors, {} messages",
        plot.source,
        plot.actors().len(),
        plot.messages().len()
    );
    Ok(())
}

fn parse_header(plot: &mut Plot, header: &str) -> Result<(), ParseError> {
    let mut seen = FxHashSet::default();
    for token in HEADER_TOKEN.find_iter(header) {
        if !seen.insert(token.as_str()) {
            return Err(
                ParseError::structural(format!("duplicate actor `{}`", token.as_str()))
                    .at(token.start()),
            );
        }
        plot.add_actor(token.as_str());
    }
    Ok(())
}

/// Whether `line` is read as a message line rather than a continuation.
pub fn is_message_line(line: &str) -> bool {
    MESSAGE_SHAPE.is_match(line)
}

/// Classify and parse one body line.
fn parse_line(plot: &mut Plot, line: &str, line_no: usize) -> Result<(), ParseError> {
    if is_message_line(line) {
        return parse_message(plot, line, line_no);
    }

    let columns = plot.actors().len();
    if let Some(message) = plot.last_message_mut()
        && let Some(payload) = scan::continuation_payload(line, columns)
    {
        message.content.push('\n');
        message.content.push_str(payload);
    }
    Ok(())
}

fn parse_message(plot: &mut Plot, line: &str, line_no: usize) -> Result<(), ParseError> {
    let scan = scan::scan_line(line)?;
    if !scan.arrow_seen {
        return Ok(());
    }

    let end = usize::try_from(scan.structural_end).unwrap_or_default();
    let payload = scan
        .payload(line)
        .ok_or_else(|| ParseError::structural("no message content").at(end))?;

    let actors = plot.actors();
    let left_index = usize::try_from(scan.pipes_before).ok();
    let right_index = actors.len().checked_sub(scan.pipes_after);
    // Both ends must be distinct header columns, left before right.
    let (Some(left), Some(right)) = (
        left_index.and_then(|i| actors.get(i)),
        right_index
            .filter(|&r| left_index.is_some_and(|l| l < r))
            .and_then(|i| actors.get(i)),
    ) else {
        return Err(ParseError::structural(format!(
            "arrow spans columns {}..{} but the header names {} actors",
            scan.pipes_before,
            actors.len() as isize - scan.pipes_after as isize,
            actors.len()
        )));
    };

    let (sender, receiver, bidirectional) = match scan.direction() {
        Direction::Both => (left.id, right.id, true),
        Direction::Right => (left.id, right.id, false),
        Direction::Left => (right.id, left.id, false),
    };

    let mut message = Message::new(sender, receiver, bidirectional, payload);
    message.source_line = line_no;
    plot.push_message(message);
    Ok(())
}
