//! Parse error types and caret diagnostics.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use thiserror::Error;

/// What part of the notation was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Header, message or continuation line geometry.
    Structural,
    /// Embedded JSON metadata.
    Metadata,
}

/// A fatal error aborting a parse.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Character offset within `line` the error points at.
    pub offset: Option<usize>,
    /// Offending source line.
    pub line: Option<String>,
    /// 1-based line number of `line`.
    pub line_no: Option<usize>,
}

impl ParseError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::Structural, message)
    }

    pub fn metadata(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::Metadata, message)
    }

    fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            offset: None,
            line: None,
            line_no: None,
        }
    }

    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach the offending line unless one is already recorded.
    pub fn on_line(mut self, line_no: usize, line: &str) -> Self {
        if self.line.is_none() {
            self.line = Some(line.to_string());
            self.line_no = Some(line_no);
        }
        self
    }

    #[inline]
    pub fn is_structural(&self) -> bool {
        self.kind == ParseErrorKind::Structural
    }

    /// Render a caret-style diagnostic.
    ///
    /// ```text
    /// error: multiple arrows in the same line
    ///   --> scenario.plot:4:14
    ///    |
    ///  4 | |---->|    |---->| oops
    ///    |             ^
    /// ```
    pub fn diagnostic(&self, source: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", "error:".red().bold(), self.message.bold());

        let Some(line) = &self.line else {
            let _ = write!(out, "  {} {}", "-->".blue(), source);
            return out;
        };
        let line_no = self.line_no.unwrap_or_default();
        let gutter = line_no.to_string().len();

        let location = match self.offset {
            Some(offset) => format!("{source}:{line_no}:{}", offset + 1),
            None => format!("{source}:{line_no}"),
        };
        let _ = writeln!(out, "{:gutter$}{} {}", "", "-->".blue(), location);
        let _ = writeln!(out, "{:gutter$} {}", "", "|".blue());
        let _ = write!(out, "{} {} {}", line_no.blue(), "|".blue(), line);

        if let Some(offset) = self.offset {
            // Tabs keep their width so the caret lines up in a terminal.
            let pad: String = line
                .chars()
                .take(offset)
                .map(|c| if c == '\t' { '\t' } else { ' ' })
                .collect();
            let _ = write!(out, "\n{:gutter$} {} {pad}{}", "", "|".blue(), "^".red().bold());
        }
        out
    }
}
