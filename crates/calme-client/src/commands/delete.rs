//! `calme --delete ID`

use std::io::Write;

use calme_core::Painter;
use calme_core::format::event_line;
use calme_providers::CalendarApi;
use tracing::{info, warn};

use super::Prompt;
use crate::error::ClientResult;

pub const CONFIRM_QUESTION: &str = "Confirm Delete? (y/n)";

/// How a delete ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Deleted,
    Aborted,
}

/// Shows the event, asks for confirmation, and deletes it on `y` or `Y`.
///
/// A lookup failure is returned before anything is asked. An unreadable
/// answer counts as a refusal.
pub async fn run<A, P, W>(
    api: &A,
    event_id: &str,
    prompt: &mut P,
    out: &mut W,
    painter: &Painter,
) -> ClientResult<Outcome>
where
    A: CalendarApi + ?Sized,
    P: Prompt + ?Sized,
    W: Write,
{
    let event = api.get(event_id).await?;
    writeln!(out, "{}", event_line("Event to Delete", &event, painter))?;
    out.flush()?;

    let answer = prompt.ask(CONFIRM_QUESTION).unwrap_or_else(|e| {
        warn!("no confirmation read: {}", e);
        String::new()
    });
    if !matches!(answer.as_str(), "y" | "Y") {
        writeln!(out, "Event Not Deleted.")?;
        return Ok(Outcome::Aborted);
    }

    api.delete(&event.id).await?;
    info!("deleted event {}", event.id);
    writeln!(out, "Event Deleted.")?;
    Ok(Outcome::Deleted)
}
