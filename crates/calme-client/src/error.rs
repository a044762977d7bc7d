//! Client error types.

use std::fmt;

use calme_core::ScheduleError;
use calme_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration file or value is unusable.
    Config(String),
    /// No valid credentials could be obtained.
    Auth(ProviderError),
    /// User input was rejected before contacting the calendar.
    Validation(ScheduleError),
    /// The calendar service call failed.
    Provider(ProviderError),
    /// Writing output failed.
    Io(std::io::Error),
    /// Reading the confirmation answer failed.
    Prompt(String),
}

impl ClientError {
    /// Classifies a failure while obtaining credentials. Configuration
    /// problems stay configuration errors; everything else means the user
    /// could not be authenticated.
    pub fn from_auth(err: ProviderError) -> Self {
        match err.code() {
            calme_providers::ProviderErrorCode::ConfigurationError => {
                Self::Config(err.message().to_string())
            }
            _ => Self::Auth(err),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Auth(err) => write!(f, "authentication failed: {}", err.message()),
            Self::Validation(err) => write!(f, "{}", err),
            Self::Provider(err) if err.is_not_found() => write!(f, "{}", err.message()),
            Self::Provider(err) => write!(f, "calendar error: {}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Prompt(msg) => write!(f, "prompt failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Auth(err) | Self::Provider(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<ScheduleError> for ClientError {
    fn from(err: ScheduleError) -> Self {
        Self::Validation(err)
    }
}
