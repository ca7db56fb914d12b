//! Append-only message log and its presentation rule.

use std::slice::Iter;

use crate::SocketEvent;

/// How a log line is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup<'a> {
    /// Shown as-is.
    Plain(&'a str),
    /// Shown bold; the leading `/` has been stripped.
    Bold(&'a str),
}

impl<'a> Markup<'a> {
    /// Classify a line: a leading `/` marks the remainder bold.
    #[must_use]
    pub fn of(line: &'a str) -> Self {
        line.strip_prefix('/').map_or(Self::Plain(line), Self::Bold)
    }

    /// The text to show, without markers.
    #[must_use]
    pub const fn text(self) -> &'a str {
        match self {
            Self::Plain(s) | Self::Bold(s) => s,
        }
    }

    /// Returns true for bold lines.
    #[must_use]
    pub const fn is_bold(self) -> bool {
        matches!(self, Self::Bold(_))
    }

    /// HTML rendering: `<strong>rest</strong>` for bold, the line otherwise.
    #[must_use]
    pub fn to_html(self) -> String {
        match self {
            Self::Plain(s) => s.to_string(),
            Self::Bold(s) => format!("<strong>{s}</strong>"),
        }
    }
}

/// Ordered, append-only sequence of display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    lines: Vec<String>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push<S: Into<String>>(&mut self, line: S) {
        self.lines.push(line.into());
    }

    /// Append the line derived from an event.
    pub fn push_event(&mut self, event: &SocketEvent) {
        self.push(event.display_line());
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines in arrival order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines paired with their markup.
    pub fn marked(&self) -> impl Iterator<Item = Markup<'_>> {
        self.lines.iter().map(|l| Markup::of(l))
    }

    /// Iterate over the raw lines.
    pub fn iter(&self) -> Iter<'_, String> {
        self.lines.iter()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a String;
    type IntoIter = Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
