//! Start/end resolution for new events.
//!
//! An event's start comes from one of three places, in priority order: an
//! explicit local date-time, an offset in minutes from now, or a default
//! placeholder half an hour out. Every event lasts [`EVENT_LENGTH_MINUTES`].

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

/// The only accepted format for explicit times.
pub const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Example shown to the user when an explicit time is rejected.
pub const LOCAL_FORMAT_EXAMPLE: &str = "2025-12-31T14:30:45";

/// Length of every created event.
pub const EVENT_LENGTH_MINUTES: i64 = 15;

/// Offset used when neither a time nor an offset is given.
pub const DEFAULT_OFFSET_MINUTES: i64 = 30;

/// Errors from resolving a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The explicit time does not match [`LOCAL_FORMAT`].
    #[error("Invalid Date Format! Example: 2025-12-31T14:30:45 (got {input:?})")]
    InvalidFormat { input: String },

    /// The resulting time is outside what chrono can represent.
    #[error("event time out of range")]
    OutOfRange,
}

/// Resolved wall-clock start and end of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Schedule {
    /// Resolves start and end.
    ///
    /// `now` is the current wall-clock time in the zone the event will be
    /// created in. `explicit_time` wins over `offset_minutes`; with neither,
    /// the event starts [`DEFAULT_OFFSET_MINUTES`] from now.
    pub fn resolve(
        explicit_time: Option<&str>,
        offset_minutes: Option<i64>,
        now: NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        let start = match (explicit_time, offset_minutes) {
            (Some(input), _) => parse_local(input)?,
            (None, Some(offset)) => add_minutes(now, offset)?,
            (None, None) => add_minutes(now, DEFAULT_OFFSET_MINUTES)?,
        };

        Ok(Self {
            start,
            end: add_minutes(start, EVENT_LENGTH_MINUTES)?,
        })
    }
}

/// Parses a local date-time, accepting only the zero-padded
/// `YYYY-MM-DDTHH:MM:SS` form.
pub fn parse_local(input: &str) -> Result<NaiveDateTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidFormat {
        input: input.to_string(),
    };

    // chrono accepts unpadded fields and signed years; the length and
    // separator checks pin the exact shape.
    let bytes = input.as_bytes();
    if bytes.len() != LOCAL_FORMAT_EXAMPLE.len() {
        return Err(invalid());
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b'T',
        13 | 16 => *b == b':',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDateTime::parse_from_str(input, LOCAL_FORMAT).map_err(|_| invalid())
}

fn add_minutes(at: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime, ScheduleError> {
    let delta = Duration::try_minutes(minutes).ok_or(ScheduleError::OutOfRange)?;
    at.checked_add_signed(delta).ok_or(ScheduleError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 10, 11)
            .unwrap()
    }

    #[test]
    fn explicit_time_is_used_verbatim() {
        let schedule = Schedule::resolve(Some("2025-12-31T14:30:45"), Some(90), now()).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(14, 30, 45)
            .unwrap();
        assert_eq!(schedule.start, expected);
        assert_eq!(schedule.end, expected + Duration::minutes(15));
    }

    #[test]
    fn explicit_time_crossing_midnight() {
        let schedule = Schedule::resolve(Some("2025-12-31T23:50:00"), None, now()).unwrap();
        assert_eq!(schedule.end.to_string(), "2026-01-01 00:05:00");
    }

    #[test]
    fn offset_is_relative_to_now() {
        for offset in [0, 1, 30, 57, 180, -45] {
            let schedule = Schedule::resolve(None, Some(offset), now()).unwrap();
            assert_eq!(schedule.start, now() + Duration::minutes(offset));
            assert_eq!(schedule.end, schedule.start + Duration::minutes(15));
        }
    }

    #[test]
    fn default_placeholder_runs_from_thirty_to_forty_five() {
        let schedule = Schedule::resolve(None, None, now()).unwrap();
        assert_eq!(schedule.start, now() + Duration::minutes(30));
        assert_eq!(schedule.end, now() + Duration::minutes(45));
    }

    #[test]
    fn malformed_times_are_rejected() {
        for input in [
            "2025-13-40T99:99:99",
            "not-a-date",
            "",
            "2025-02-30T10:00:00",
            "2025-1-5T01:02:03",
            "2025-12-31 14:30:45",
            "2025-12-31T14:30",
            "2025-12-31T14:30:45Z",
            "+2025-12-31T14:30:4",
        ] {
            let err = Schedule::resolve(Some(input), Some(30), now()).unwrap_err();
            assert_eq!(
                err,
                ScheduleError::InvalidFormat {
                    input: input.to_string()
                },
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn format_error_shows_example() {
        let err = parse_local("tomorrow").unwrap_err();
        assert!(err.to_string().contains(LOCAL_FORMAT_EXAMPLE));
    }

    #[test]
    fn huge_offset_is_out_of_range() {
        let err = Schedule::resolve(None, Some(i64::MAX), now()).unwrap_err();
        assert_eq!(err, ScheduleError::OutOfRange);
    }
}
