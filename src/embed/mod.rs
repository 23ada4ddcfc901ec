//! Built-in message templates.
//!
//! - `show.txt`       - per-message report printed by `seqplot show`
//! - `transcript.txt` - one line per message, used by `seqplot transcript`
//!
//! A templates directory may override either by file name.

/// Per-message report.
pub const SHOW_TXT: &str = include_str!("show.txt");

/// One transcript line.
pub const TRANSCRIPT_TXT: &str = include_str!("transcript.txt");

/// Built-in template body by identifier.
pub fn builtin(id: &str) -> Option<&'static str> {
    match id {
        "show.txt" => Some(SHOW_TXT),
        "transcript.txt" => Some(TRANSCRIPT_TXT),
        _ => None,
    }
}
