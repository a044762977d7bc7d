//! The calendar facade used by the command handlers.
//!
//! [`CalendarApi`] covers the four operations `calme` needs against the
//! user's primary calendar. It is object-safe so handlers can be driven by
//! the Google client in production and an in-memory calendar in tests.

use std::future::Future;
use std::pin::Pin;

use calme_core::{Event, NewEvent};

use crate::error::ProviderResult;

/// Reserved identifier of the authenticated user's default calendar.
pub const PRIMARY_CALENDAR: &str = "primary";

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Event operations on the primary calendar.
///
/// Implementations perform no caching and no retries: every failure is
/// returned to the caller as a [`ProviderError`](crate::ProviderError).
pub trait CalendarApi: Send + Sync {
    /// Lists up to `max_results` events starting at or after now, recurring
    /// events expanded into single instances, in ascending start order.
    fn list_upcoming(&self, max_results: u32) -> BoxFuture<'_, ProviderResult<Vec<Event>>>;

    /// Creates an event and returns it as stored, with its new identifier.
    fn insert(&self, event: NewEvent) -> BoxFuture<'_, ProviderResult<Event>>;

    /// Fetches one event. Fails with a not-found error if it does not exist.
    fn get<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<Event>>;

    /// Deletes one event. Fails with a not-found error if it does not exist.
    fn delete<'a>(&'a self, event_id: &'a str) -> BoxFuture<'a, ProviderResult<()>>;
}
