//! Google Calendar provider configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// Default file name of the client identity downloaded from Google Cloud Console.
pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Default file name of the token cache.
pub const TOKEN_FILE_NAME: &str = "token.json";

/// OAuth 2.0 client identity for an installed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
}

/// Layout of the client-secret JSON file.
///
/// Google Cloud Console writes the identity under `installed` (desktop
/// apps) or `web`; other tools write it flat at the root.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecretSection>,
    web: Option<ClientSecretSection>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretSection {
    client_id: String,
    client_secret: String,
}

impl OAuthCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Loads the client identity from a client-secret JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!(
                "cannot read client secret file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses the client identity from client-secret JSON.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("failed to parse client secret JSON: {}", e))
        })?;

        let credentials = match (file.installed.or(file.web), file.client_id, file.client_secret) {
            (Some(section), _, _) => Self::new(section.client_id, section.client_secret),
            (None, Some(id), Some(secret)) => Self::new(id, secret),
            _ => {
                return Err(ProviderError::configuration(
                    "client secret file needs an 'installed'/'web' section or root-level \
                     'client_id'/'client_secret'",
                ));
            }
        };

        credentials.validate()?;
        Ok(credentials)
    }

    /// Checks that the identity looks like a Google OAuth client.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.client_id.is_empty() {
            return Err(ProviderError::configuration("client_id is required"));
        }
        if !self.client_id.ends_with(".apps.googleusercontent.com") {
            return Err(ProviderError::configuration(
                "client_id should end with .apps.googleusercontent.com",
            ));
        }
        if self.client_secret.is_empty() {
            return Err(ProviderError::configuration("client_secret is required"));
        }
        Ok(())
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Client-secret JSON, read only when interactive consent is needed.
    ///
    /// Defaults to `credentials.json` next to the executable.
    pub credentials_path: PathBuf,

    /// Token cache.
    ///
    /// Defaults to `token.json` next to the executable.
    pub token_path: PathBuf,

    /// Request timeout for token and calendar calls.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Inclusive port range for the loopback consent server.
    ///
    /// `(0, 0)` lets the operating system pick a free port.
    pub loopback_port_range: (u16, u16),

    /// OAuth scopes to request. Changing them forces a new consent.
    pub scopes: Vec<String>,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Read/write access to the user's calendars.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar";

    /// Creates a configuration with files next to the executable.
    pub fn new() -> Self {
        let dir = Self::install_dir();
        Self {
            credentials_path: dir.join(CREDENTIALS_FILE_NAME),
            token_path: dir.join(TOKEN_FILE_NAME),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calme/{}", env!("CARGO_PKG_VERSION")),
            loopback_port_range: (0, 0),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
        }
    }

    /// Directory holding the running executable, or `.` if it cannot be
    /// determined.
    pub fn install_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.canonicalize().ok())
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Sets the client-secret file path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Sets the token cache path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the loopback port range for OAuth.
    pub fn with_loopback_port_range(mut self, start: u16, end: u16) -> Self {
        self.loopback_port_range = (start, end);
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.scopes.is_empty() {
            return Err(ProviderError::configuration(
                "at least one OAuth scope is required",
            ));
        }

        if self.loopback_port_range.0 > self.loopback_port_range.1 {
            return Err(ProviderError::configuration("invalid loopback port range"));
        }

        Ok(())
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self::new()
    }
}
