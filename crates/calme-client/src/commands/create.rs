//! Default mode: create an event.

use std::future::Future;
use std::io::Write;

use calme_core::format::event_line;
use calme_core::{Event, NewEvent, Painter, Schedule};
use calme_providers::CalendarApi;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::ClientResult;

/// What the user asked to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub time: Option<String>,
    pub offset_minutes: Option<i64>,
    pub remind_minutes: u32,
    pub note: String,
}

impl CreateRequest {
    /// Resolves the schedule and builds the insert payload. Fails on a
    /// malformed `time` without touching the network.
    pub fn build(&self, now: NaiveDateTime, time_zone: Tz) -> ClientResult<NewEvent> {
        let schedule = Schedule::resolve(self.time.as_deref(), self.offset_minutes, now)?;
        debug!(
            "event scheduled {} to {} in {}",
            schedule.start,
            schedule.end,
            time_zone.name()
        );
        Ok(NewEvent::from_note(
            &self.note,
            schedule,
            self.remind_minutes,
            time_zone.name(),
        ))
    }
}

/// Current wall-clock time in `time_zone`.
pub fn now_in(time_zone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&time_zone).naive_local()
}

/// Builds the event, then connects and inserts it. A malformed time fails
/// before `connect` is called, so no consent flow or request happens.
pub async fn run_request<A, C, Fut, W>(
    request: &CreateRequest,
    time_zone: Tz,
    connect: C,
    out: &mut W,
    painter: &Painter,
) -> ClientResult<Event>
where
    A: CalendarApi,
    C: FnOnce() -> Fut,
    Fut: Future<Output = ClientResult<A>>,
    W: Write,
{
    let event = request.build(now_in(time_zone), time_zone)?;
    let calendar = connect().await?;
    run(&calendar, event, out, painter).await
}

/// Inserts the event and reports it.
pub async fn run<A, W>(api: &A, event: NewEvent, out: &mut W, painter: &Painter) -> ClientResult<Event>
where
    A: CalendarApi + ?Sized,
    W: Write,
{
    let created = api.insert(event).await?;
    writeln!(out, "{}", event_line("Event Created", &created, painter))?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{FakeCalendar, output};
    use crate::error::ClientError;
    use calme_core::Reminder;
    use chrono::Duration;
    use std::cell::Cell;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-03-10T08:00:00", calme_core::LOCAL_FORMAT).unwrap()
    }

    fn request(time: Option<&str>, offset: Option<i64>, remind: u32, note: &str) -> CreateRequest {
        CreateRequest {
            time: time.map(str::to_string),
            offset_minutes: offset,
            remind_minutes: remind,
            note: note.to_string(),
        }
    }

    #[tokio::test]
    async fn standup_with_defaults() {
        let calendar = FakeCalendar::default();
        let event = request(None, None, 15, "Standup")
            .build(now(), chrono_tz::America::Toronto)
            .unwrap();
        let mut out = Vec::new();

        let created = run(&calendar, event, &mut out, &Painter::plain()).await.unwrap();

        let inserted = calendar.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        let sent = &inserted[0];
        assert_eq!(sent.start, now() + Duration::minutes(30));
        assert_eq!(sent.end, now() + Duration::minutes(45));
        assert_eq!(sent.summary, "Standup");
        assert_eq!(sent.description, "Standup");
        assert_eq!(sent.time_zone, "America/Toronto");
        assert_eq!(sent.reminders, vec![Reminder::email(15), Reminder::popup(7)]);

        assert_eq!(
            output(out),
            format!(
                "Event Created: ID: {}, Date: 2025-03-10T08:30:00+00:00, Note: Standup\n",
                created.id
            )
        );
    }

    #[test]
    fn explicit_time_wins_over_offset() {
        let event = request(Some("2025-12-31T14:30:45"), Some(30), 30, "Review")
            .build(now(), Tz::UTC)
            .unwrap();
        assert_eq!(event.start.to_string(), "2025-12-31 14:30:45");
        assert_eq!(event.end - event.start, Duration::minutes(15));
        assert_eq!(event.reminders, vec![Reminder::email(30), Reminder::popup(15)]);
    }

    #[test]
    fn offset_from_now() {
        let event = request(None, Some(90), 15, "Lunch").build(now(), Tz::UTC).unwrap();
        assert_eq!(event.start, now() + Duration::minutes(90));
    }

    #[test]
    fn long_note_is_truncated_in_the_summary_only() {
        let note = "abcdefghijklmnopqrstuvwxy";
        let event = request(None, Some(30), 15, note).build(now(), Tz::UTC).unwrap();
        assert_eq!(event.summary, "abcdefghijklmnopqrst");
        assert_eq!(event.description, note);
    }

    #[test]
    fn malformed_time_is_a_validation_error() {
        for bad in ["2025-13-40T99:99:99", "not-a-date", "2025-1-5T9:00:00"] {
            let err = request(Some(bad), Some(30), 15, "x")
                .build(now(), Tz::UTC)
                .unwrap_err();
            assert!(matches!(err, ClientError::Validation(_)), "{bad}");
            assert!(err.to_string().contains("2025-12-31T14:30:45"));
        }
    }

    #[tokio::test]
    async fn malformed_time_never_connects() {
        let connects = Cell::new(0);
        let mut out = Vec::new();

        let err = run_request(
            &request(Some("2025-13-40T99:99:99"), Some(30), 15, "x"),
            Tz::UTC,
            || {
                connects.set(connects.get() + 1);
                async { Ok(FakeCalendar::default()) }
            },
            &mut out,
            &Painter::plain(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(connects.get(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn valid_request_connects_once_and_reports() {
        let connects = Cell::new(0);
        let mut out = Vec::new();

        let created = run_request(
            &request(Some("2025-12-31T14:30:45"), Some(30), 15, "Review"),
            Tz::UTC,
            || {
                connects.set(connects.get() + 1);
                async { Ok(FakeCalendar::default()) }
            },
            &mut out,
            &Painter::plain(),
        )
        .await
        .unwrap();

        assert_eq!(connects.get(), 1);
        assert_eq!(created.id, "created1");
        assert_eq!(
            output(out),
            "Event Created: ID: created1, Date: 2025-12-31T14:30:45+00:00, Note: Review\n"
        );
    }

    #[tokio::test]
    async fn connect_failure_propagates() {
        let mut out = Vec::new();

        let err = run_request(
            &request(None, Some(30), 15, "x"),
            Tz::UTC,
            || async {
                Err::<FakeCalendar, _>(ClientError::Config("credentials.json missing".into()))
            },
            &mut out,
            &Painter::plain(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Config(_)));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn insert_failure_propagates() {
        let calendar = FakeCalendar::failing(|| {
            calme_providers::ProviderError::bad_request("request for new event rejected: bad zone")
        });
        let event = request(None, None, 15, "x").build(now(), Tz::UTC).unwrap();
        let mut out = Vec::new();

        let err = run(&calendar, event, &mut out, &Painter::plain()).await.unwrap_err();
        assert!(matches!(err, ClientError::Provider(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn now_in_zone_is_wall_clock() {
        let utc = now_in(Tz::UTC);
        let drift = (Utc::now().naive_utc() - utc).num_seconds().abs();
        assert!(drift < 5);
    }
}
