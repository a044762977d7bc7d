//! Error types for calendar provider operations.
//!
//! Every failure that originates at the calendar service or the OAuth
//! endpoints is a [`ProviderError`]. The [`ProviderErrorCode`] tells callers
//! what kind of failure it was without parsing messages.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Credentials are missing, expired, or were rejected.
    AuthenticationFailed,
    /// The user lacks permission for the calendar or event.
    AuthorizationFailed,
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// Too many requests.
    RateLimited,
    /// The service returned a 5xx or an unexpected status.
    ServerError,
    /// The response could not be parsed.
    InvalidResponse,
    /// The event does not exist or was deleted.
    NotFound,
    /// The service rejected the request as malformed.
    BadRequest,
    /// Missing or invalid local configuration (client secret, token file).
    ConfigurationError,
    /// Unexpected internal state.
    InternalError,
}

impl ProviderErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the calendar service.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::BadRequest, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InternalError, message)
    }

    /// Maps a non-success HTTP status from the Calendar API to an error.
    ///
    /// `what` names the thing being requested, e.g. `event abc123`.
    pub fn from_status(status: StatusCode, what: &str, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => {
                Self::authentication("access token expired or invalid")
            }
            StatusCode::FORBIDDEN => Self::authorization(format!("access denied to {}", what)),
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                Self::not_found(format!("{} not found", what))
            }
            StatusCode::TOO_MANY_REQUESTS => Self::rate_limited("rate limit exceeded"),
            StatusCode::BAD_REQUEST => Self::bad_request(format!(
                "request for {} rejected: {}",
                what,
                api_error_message(body)
            )),
            _ => Self::server(format!("API error ({}): {}", status, api_error_message(body))),
        }
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the event or calendar does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code == ProviderErrorCode::NotFound
    }

    /// Returns true if the error means the credentials are unusable.
    pub fn is_authentication(&self) -> bool {
        self.code == ProviderErrorCode::AuthenticationFailed
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Pulls `error.message` out of a Google API error body, falling back to
/// the raw body.
fn api_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(serde::Deserialize)]
    struct Detail {
        message: String,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display() {
        assert_eq!(
            ProviderErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(ProviderErrorCode::NotFound.to_string(), "not_found");
    }

    #[test]
    fn provider_error_creation() {
        let err = ProviderError::authentication("token expired");
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), "token expired");
        assert!(err.is_authentication());
        assert!(!err.is_not_found());
    }

    #[test]
    fn provider_error_display() {
        let err = ProviderError::rate_limited("too many requests");
        assert_eq!(err.to_string(), "rate_limited: too many requests");
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ProviderError::configuration("failed to write token file").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (StatusCode::UNAUTHORIZED, ProviderErrorCode::AuthenticationFailed),
            (StatusCode::FORBIDDEN, ProviderErrorCode::AuthorizationFailed),
            (StatusCode::NOT_FOUND, ProviderErrorCode::NotFound),
            (StatusCode::GONE, ProviderErrorCode::NotFound),
            (StatusCode::TOO_MANY_REQUESTS, ProviderErrorCode::RateLimited),
            (StatusCode::BAD_REQUEST, ProviderErrorCode::BadRequest),
            (StatusCode::INTERNAL_SERVER_ERROR, ProviderErrorCode::ServerError),
            (StatusCode::CONFLICT, ProviderErrorCode::ServerError),
        ];
        for (status, code) in cases {
            assert_eq!(
                ProviderError::from_status(status, "event x", "").code(),
                code,
                "{status}"
            );
        }
    }

    #[test]
    fn not_found_names_the_target() {
        let err = ProviderError::from_status(StatusCode::NOT_FOUND, "event nonexistent-id", "");
        assert!(err.is_not_found());
        assert_eq!(err.message(), "event nonexistent-id not found");
    }

    #[test]
    fn google_error_body_is_unwrapped() {
        let body = r#"{"error": {"code": 400, "message": "Bad Request: invalid time zone", "errors": []}}"#;
        let err = ProviderError::from_status(StatusCode::BAD_REQUEST, "new event", body);
        assert_eq!(
            err.message(),
            "request for new event rejected: Bad Request: invalid time zone"
        );

        let err = ProviderError::from_status(StatusCode::BAD_GATEWAY, "events", "upstream down\n");
        assert_eq!(err.message(), "API error (502 Bad Gateway): upstream down");
    }
}
