//! Calendar access for `calme`.
//!
//! - [`CalendarApi`] - the four event operations the commands need
//! - [`google`] - the Google Calendar implementation and its OAuth plumbing
//! - [`ProviderError`] - what can go wrong talking to the service
//!
//! # Example
//!
//! ```ignore
//! use calme_providers::{CalendarApi, google::{CredentialStore, GoogleConfig}};
//!
//! let store = CredentialStore::new(GoogleConfig::new())?;
//! let calendar = store.connect().await?;
//! for event in calendar.list_upcoming(10).await? {
//!     println!("{} {}", event.start, event.summary);
//! }
//! ```

pub mod api;
pub mod error;
pub mod google;

pub use api::{BoxFuture, CalendarApi, PRIMARY_CALENDAR};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
