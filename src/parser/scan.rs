//! Column scanner for message and continuation lines.
//!
//! A message line is read left to right in one pass. Pipes before the dash
//! run count the columns left of the arrow, pipes after it count the columns
//! right of it, and the first non-structural character starts the payload.

use super::ParseError;

/// Where the arrow of a message line points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `<>`, `><` or no head at all.
    Both,
    /// `>`: left actor sends to right actor.
    Right,
    /// `<`: right actor sends to left actor.
    Left,
}

impl Direction {
    pub fn from_glyphs(glyphs: &str) -> Self {
        match glyphs {
            ">" => Self::Right,
            "<" => Self::Left,
            _ => Self::Both,
        }
    }
}

/// Geometry of one message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScan {
    /// Pipes before the arrow minus one: the left actor's column.
    pub pipes_before: isize,
    /// Pipes after the arrow started.
    pub pipes_after: usize,
    pub arrow_seen: bool,
    /// Arrow heads in the order they appeared.
    pub glyphs: String,
    /// Index of the last structural character.
    pub structural_end: isize,
}

#[inline]
const fn is_structural(b: u8) -> bool {
    matches!(b, b'\t' | b' ' | b'-' | b'|' | b'<' | b'>')
}

/// Scan the structural prefix of a message line.
///
/// Fails only when a second dash run starts after the first one closed.
pub fn scan_line(line: &str) -> Result<LineScan, ParseError> {
    let mut scan = LineScan {
        pipes_before: -1,
        pipes_after: 0,
        arrow_seen: false,
        glyphs: String::new(),
        structural_end: -1,
    };
    let mut arrow_closed = false;
    let mut stopped = false;

    // Structural characters are ASCII, so byte and char offsets agree up to
    // the first payload character.
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'|' if scan.arrow_seen => scan.pipes_after += 1,
            b'|' => scan.pipes_before += 1,
            b'-' => {
                if arrow_closed {
                    return Err(
                        ParseError::structural("multiple arrows in the same line").at(i)
                    );
                }
                scan.arrow_seen = true;
            }
            b'<' | b'>' => scan.glyphs.push(b as char),
            _ if !is_structural(b) => {
                scan.structural_end = i as isize - 1;
                stopped = true;
                break;
            }
            _ => {}
        }
        if scan.arrow_seen && b != b'-' {
            arrow_closed = true;
        }
    }
    if !stopped {
        scan.structural_end = line.len() as isize - 1;
    }
    Ok(scan)
}

impl LineScan {
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_glyphs(&self.glyphs)
    }

    /// Trailing text after the structural run.
    ///
    /// Only present when the arrow stopped before the last column.
    pub fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
        if self.pipes_after == 0 {
            return None;
        }
        let start = usize::try_from(self.structural_end + 1).unwrap_or_default();
        line.get(start..).filter(|payload| !payload.is_empty())
    }
}

/// Text a continuation line adds to the previous message.
///
/// The payload follows the `columns`-th pipe, minus one leading space.
/// Empty payloads and payloads starting with `#` add nothing.
pub fn continuation_payload(line: &str, columns: usize) -> Option<&str> {
    let (pipe, _) = line.match_indices('|').nth(columns.checked_sub(1)?)?;
    let rest = &line[pipe + 1..];
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    if rest.is_empty() || rest.starts_with('#') {
        None
    } else {
        Some(rest)
    }
}
