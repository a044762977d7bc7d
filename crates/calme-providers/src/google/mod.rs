//! Google Calendar backend.
//!
//! Authentication follows the installed-app flow: the client secret comes
//! from a `credentials.json` downloaded from Google Cloud Console, consent
//! happens once in the browser through a loopback redirect, and the
//! resulting tokens are cached in `token.json` and refreshed silently.
//!
//! [`CredentialStore`] ties those pieces together and hands out a
//! [`GoogleCalendar`], which implements [`CalendarApi`](crate::CalendarApi)
//! against the user's primary calendar.

mod client;
mod config;
mod oauth;
mod store;
mod tokens;

pub use client::GoogleCalendar;
pub use config::{CREDENTIALS_FILE_NAME, GoogleConfig, OAuthCredentials, TOKEN_FILE_NAME};
pub use oauth::{OAuthClient, PkceFlow};
pub use store::{CredentialStore, TokenAction};
pub use tokens::{TokenInfo, TokenStorage};
