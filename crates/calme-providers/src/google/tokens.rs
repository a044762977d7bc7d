//! OAuth token cache.
//!
//! The cache is a single JSON file. Besides its own field names it accepts
//! the ones written by Google's Python client (`token`, `expiry`), so a
//! cache created by that library is picked up without a new consent.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// Seconds shaved off a token's lifetime so it is refreshed before the
/// server starts rejecting it.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A cached OAuth token set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Bearer token for API requests.
    #[serde(alias = "token")]
    pub access_token: String,

    /// Long-lived token used to obtain new access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// When the access token stops being usable.
    #[serde(default, alias = "expiry")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Scopes granted by the user.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// When the tokens were last obtained or refreshed.
    #[serde(default = "Utc::now")]
    pub last_refresh: DateTime<Utc>,
}

impl TokenInfo {
    /// Creates a token set from a token endpoint response.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at: expiry_from(expires_in_secs),
            scopes,
            last_refresh: Utc::now(),
        }
    }

    /// Returns true if the access token is expired. Tokens without an
    /// expiry never expire.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Returns true if the token can be refreshed without user interaction.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Returns true if every required scope was granted.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }

    /// Applies a refresh response. The refresh token is kept unless the
    /// server rotated it.
    pub fn refreshed(
        mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
        rotated_refresh_token: Option<String>,
    ) -> Self {
        self.access_token = access_token.into();
        self.expires_at = expiry_from(expires_in_secs);
        if rotated_refresh_token.is_some() {
            self.refresh_token = rotated_refresh_token;
        }
        self.last_refresh = Utc::now();
        self
    }
}

fn expiry_from(expires_in_secs: Option<i64>) -> Option<DateTime<Utc>> {
    expires_in_secs.map(|secs| Utc::now() + Duration::seconds(secs - EXPIRY_MARGIN_SECS))
}

/// File-backed token cache.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token cache path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cache. `Ok(None)` means there is no cache file yet.
    pub fn load(&self) -> ProviderResult<Option<TokenInfo>> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to read token file: {}", e))
                .with_source(e)
        })?;

        let tokens: TokenInfo = serde_json::from_str(&content).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("loaded tokens from {:?}", self.path);
        Ok(Some(tokens))
    }

    /// Writes the cache, replacing any previous content.
    ///
    /// The file is written next to its final location and renamed into
    /// place, and is only readable by the owner on Unix.
    pub fn save(&self, tokens: &TokenInfo) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| ProviderError::internal(format!("failed to serialize tokens: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| {
            ProviderError::configuration(format!("failed to write token file: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to replace token file: {}", e))
        })?;

        info!("saved tokens to {:?}", self.path);
        Ok(())
    }
}
