//! Title and embedded JSON extraction from message content.
//!
//! Content without `{` splits into a title token and the remaining text.
//! Content with `{` carries a JSON object: the text before the brace is the
//! title, and the JSON text runs from the first `{` through two characters
//! past the first `}`. That over-read is kept as is, so a message such as
//! `EVT {"a": 1} tail` fails because ` t` trails the object.

use serde_json::{Map, Value as JsonValue};

use super::ParseError;
use crate::plot::Message;

/// Derive `title`, `content` and `data` from a message's raw content.
pub fn finalize(message: &mut Message) -> Result<(), ParseError> {
    let content = message.content.as_str();

    let Some(open) = content.find('{') else {
        let trimmed = content.trim();
        let (title, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((title, rest)) => (title, rest.trim_start()),
            None => (trimmed, ""),
        };
        message.title = Some(title.to_string());
        message.content = rest.to_string();
        message.data = Map::new();
        return Ok(());
    };

    let Some(close) = content.find('}') else {
        return Err(ParseError::metadata("invalid JSON data, no ending }"));
    };

    let end = json_end(content, close);
    let json = content.get(open..end).unwrap_or_default();
    let data = serde_json::from_str::<Map<String, JsonValue>>(json).map_err(|err| {
        ParseError::metadata(format!(
            "invalid JSON data in message at line {}: {err}",
            message.source_line
        ))
    })?;

    message.title = Some(content[..open].trim().to_string());
    message.content = content[end..].trim().to_string();
    message.data = data;
    Ok(())
}

/// Byte index two characters past the `}` at `close`, clamped to the end.
fn json_end(content: &str, close: usize) -> usize {
    let after = close + 1;
    content[after..]
        .char_indices()
        .nth(2)
        .map_or(content.len(), |(i, _)| after + i)
}
