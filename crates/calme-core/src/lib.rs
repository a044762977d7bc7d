//! Core types: events, schedules, reminders, styled output

pub mod event;
pub mod format;
pub mod schedule;
pub mod tracing;

pub use event::{
    DEFAULT_NOTE, DEFAULT_REMIND_MINUTES, Event, EventTime, NewEvent, Reminder, ReminderMethod,
    SUMMARY_MAX_CHARS,
};
pub use format::{Painter, Style, truncate};
pub use schedule::{DEFAULT_OFFSET_MINUTES, LOCAL_FORMAT, Schedule, ScheduleError};
pub use self::tracing::{TracingConfig, TracingError, init_tracing};
