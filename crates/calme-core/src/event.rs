//! Calendar event types.
//!
//! [`Event`] is what the calendar service hands back; [`NewEvent`] is the
//! payload `calme` sends when creating one. Both are plain data: the mapping
//! to and from the provider's JSON lives in the provider crate.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::truncate;
use crate::schedule::Schedule;

/// Maximum number of characters kept in a created event's summary.
pub const SUMMARY_MAX_CHARS: usize = 20;

/// Default reminder lead time, in minutes.
pub const DEFAULT_REMIND_MINUTES: u32 = 15;

/// Note used when the user does not give one.
pub const DEFAULT_NOTE: &str = "Empty Event Created";

/// Start or end of an event as reported by the calendar.
///
/// Timed events carry the offset the server rendered them in; all-day
/// events only carry a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    /// A specific instant, with the offset it was reported in.
    DateTime(DateTime<FixedOffset>),
    /// An all-day date.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Converts to UTC for ordering. All-day dates map to midnight UTC.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => dt.with_timezone(&Utc),
            Self::AllDay(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::AllDay(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    Email,
    Popup,
}

/// A per-event reminder override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: ReminderMethod,
    /// Lead time before the event start.
    pub minutes: u32,
}

impl Reminder {
    pub fn email(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Email,
            minutes,
        }
    }

    pub fn popup(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Popup,
            minutes,
        }
    }

    /// The override pair attached to every created event: an email at
    /// `minutes` and a popup at half of it, rounded down.
    pub fn overrides(minutes: u32) -> Vec<Self> {
        vec![Self::email(minutes), Self::popup(minutes / 2)]
    }
}

/// An event read back from the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Provider-assigned identifier.
    pub id: String,
    /// Event title. Empty when the provider has none.
    pub summary: String,
    /// Free-text description.
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// IANA time zone the event was scheduled in, if reported.
    pub time_zone: Option<String>,
    /// Reminder overrides. Empty when the calendar defaults apply.
    pub reminders: Vec<Reminder>,
}

impl Event {
    /// Creates an event with the required fields.
    pub fn new(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: EventTime,
        end: EventTime,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            description: None,
            start,
            end,
            time_zone: None,
            reminders: Vec::new(),
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Builder method to set reminder overrides.
    pub fn with_reminders(mut self, reminders: Vec<Reminder>) -> Self {
        self.reminders = reminders;
        self
    }

    /// The text shown as the event's note: its description, or the summary
    /// when it has none.
    pub fn note(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.summary)
    }
}

/// Payload for creating an event.
///
/// Start and end are wall-clock times interpreted in `time_zone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA time zone name, e.g. `America/Toronto`.
    pub time_zone: String,
    pub reminders: Vec<Reminder>,
}

impl NewEvent {
    /// Builds the event for a note.
    ///
    /// The summary keeps the first [`SUMMARY_MAX_CHARS`] characters of the
    /// note while the description keeps all of it.
    pub fn from_note(
        note: &str,
        schedule: Schedule,
        remind_minutes: u32,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            summary: truncate(note, SUMMARY_MAX_CHARS).into_owned(),
            description: note.to_string(),
            start: schedule.start,
            end: schedule.end,
            time_zone: time_zone.into(),
            reminders: Reminder::overrides(remind_minutes),
        }
    }
}
