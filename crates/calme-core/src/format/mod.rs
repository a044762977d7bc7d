//! Terminal output for calendar events.
//!
//! Handlers never embed escape sequences themselves: they tag text with a
//! [`Style`] and let a [`Painter`] decide how (or whether) to color it.
//!
//! # Example
//!
//! ```rust
//! use calme_core::format::{Painter, Style};
//!
//! let painter = Painter::plain();
//! assert_eq!(painter.paint(Style::Id, "abc123"), "abc123");
//! ```

use std::borrow::Cow;

use owo_colors::OwoColorize;

use crate::event::Event;

/// Width of the identifier column in the event table.
pub const ID_WIDTH: usize = 80;
/// Width of the date column in the event table.
pub const DATE_WIDTH: usize = 40;
/// Width of the title column in the event table.
pub const TITLE_WIDTH: usize = 40;
/// Titles longer than this are cut in the event table.
pub const TITLE_MAX_CHARS: usize = 40;
/// Width of the rule printed under each row.
pub const RULE_WIDTH: usize = ID_WIDTH + DATE_WIDTH + TITLE_WIDTH;

/// Named output styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Event identifiers.
    Id,
    /// Event dates and times.
    Date,
    /// Event titles and notes.
    Title,
    /// Failures and empty results.
    Error,
}

/// Applies [`Style`]s to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    color: bool,
}

impl Painter {
    /// Creates a painter, coloring output only when `color` is set.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// A painter that emits ANSI colors.
    pub fn colored() -> Self {
        Self::new(true)
    }

    /// A painter that returns text unchanged.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Renders `text` in the given style.
    pub fn paint(&self, style: Style, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match style {
            Style::Id => text.cyan().to_string(),
            Style::Date => text.magenta().to_string(),
            Style::Title => text.green().to_string(),
            Style::Error => text.red().to_string(),
        }
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::colored()
    }
}

/// Keeps the first `max_chars` characters of `s`.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(s[..byte_idx].to_string()),
        None => Cow::Borrowed(s),
    }
}

/// Header row of the event table.
pub fn table_header() -> String {
    format!(
        "{:.^id$}{:.^date$}{:.^title$}",
        "Event ID",
        "Event Date",
        "Event Title",
        id = ID_WIDTH,
        date = DATE_WIDTH,
        title = TITLE_WIDTH,
    )
}

/// One table row: identifier, start, and title.
pub fn table_row(event: &Event, painter: &Painter) -> String {
    let id = format!("{:<width$}", event.id, width = ID_WIDTH);
    let start = format!("{:^width$}", event.start.to_string(), width = DATE_WIDTH);
    let title = format!(
        "{:<width$}",
        truncate(&event.summary, TITLE_MAX_CHARS),
        width = TITLE_WIDTH
    );

    format!(
        "{}{}{}",
        painter.paint(Style::Id, &id),
        painter.paint(Style::Date, &start),
        painter.paint(Style::Title, &title),
    )
}

/// Rule printed under each table row.
pub fn table_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Renders the whole event table, one line per entry in the result.
pub fn event_table(events: &[Event], painter: &Painter) -> Vec<String> {
    let mut lines = Vec::with_capacity(1 + events.len() * 2);
    lines.push(table_header());
    for event in events {
        lines.push(table_row(event, painter));
        lines.push(table_rule());
    }
    lines
}

/// Single-line summary of an event, e.g.
/// `Event Created: ID: abc, Date: 2025-01-01T10:00:00-05:00, Note: Standup`.
pub fn event_line(label: &str, event: &Event, painter: &Painter) -> String {
    format!(
        "{}: ID: {}, Date: {}, Note: {}",
        label,
        painter.paint(Style::Id, &event.id),
        painter.paint(Style::Date, &event.start.to_string()),
        painter.paint(Style::Title, event.note()),
    )
}
