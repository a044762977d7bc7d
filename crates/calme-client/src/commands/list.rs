//! `calme --list N`

use std::io::Write;

use calme_core::format::event_table;
use calme_core::{Painter, Style};
use calme_providers::CalendarApi;
use tracing::debug;

use crate::error::ClientResult;

/// Prints up to `count` upcoming events as a table. Returns how many were
/// shown.
pub async fn run<A, W>(api: &A, count: u32, out: &mut W, painter: &Painter) -> ClientResult<usize>
where
    A: CalendarApi + ?Sized,
    W: Write,
{
    writeln!(out, "Getting the upcoming {} events", count)?;

    let events = api.list_upcoming(count).await?;
    debug!("listing {} events", events.len());

    if events.is_empty() {
        writeln!(out, "{}", painter.paint(Style::Error, "No upcoming events found."))?;
        return Ok(0);
    }

    for line in event_table(&events, painter) {
        writeln!(out, "{}", line)?;
    }
    Ok(events.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{FakeCalendar, event_at, output};
    use crate::error::ClientError;
    use calme_providers::ProviderError;

    #[tokio::test]
    async fn lists_events_in_start_order() {
        let calendar = FakeCalendar::with_events(vec![
            event_at("evt-c", "Retro", 16),
            event_at("evt-a", "Standup", 9),
            event_at("evt-b", "Lunch", 12),
        ]);
        let mut out = Vec::new();

        let shown = run(&calendar, 5, &mut out, &Painter::plain()).await.unwrap();
        assert_eq!(shown, 3);

        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 1 + 3 * 2);
        assert_eq!(lines[0], "Getting the upcoming 5 events");
        assert!(lines[1].contains("Event ID"));
        assert!(lines[2].starts_with("evt-a "));
        assert!(lines[4].starts_with("evt-b "));
        assert!(lines[6].starts_with("evt-c "));
        assert_eq!(lines[3], "-".repeat(160));
        assert!(lines[2].contains("2030-01-01T09:00:00+00:00"));
        assert!(lines[2].trim_end().ends_with("Standup"));
    }

    #[tokio::test]
    async fn respects_the_requested_count() {
        let calendar = FakeCalendar::with_events(vec![
            event_at("a", "One", 9),
            event_at("b", "Two", 10),
            event_at("c", "Three", 11),
        ]);
        let mut out = Vec::new();

        assert_eq!(run(&calendar, 2, &mut out, &Painter::plain()).await.unwrap(), 2);
        assert!(!output(out).contains("Three"));
    }

    #[tokio::test]
    async fn empty_calendar_says_so_in_red() {
        let calendar = FakeCalendar::default();
        let mut out = Vec::new();

        let shown = run(&calendar, 10, &mut out, &Painter::colored()).await.unwrap();
        assert_eq!(shown, 0);
        assert_eq!(
            output(out),
            "Getting the upcoming 10 events\n\x1b[31mNo upcoming events found.\x1b[39m\n"
        );
    }

    #[tokio::test]
    async fn provider_failures_propagate() {
        let calendar = FakeCalendar::failing(|| ProviderError::server("API error (503): down"));
        let mut out = Vec::new();

        let err = run(&calendar, 10, &mut out, &Painter::plain()).await.unwrap_err();
        assert!(matches!(err, ClientError::Provider(_)));
    }
}
