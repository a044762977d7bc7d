//! Obtaining a usable access token.
//!
//! [`CredentialStore::obtain`] reuses the token cache when it can, refreshes
//! an expired token silently, and only falls back to browser consent when
//! neither works. Any new or refreshed token is written back to the cache.

use tracing::{debug, info, warn};

use crate::error::ProviderResult;

use super::client::GoogleCalendar;
use super::config::{GoogleConfig, OAuthCredentials};
use super::oauth::OAuthClient;
use super::tokens::{TokenInfo, TokenStorage};

/// What to do with the cached tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    /// The cached access token is still valid.
    UseCached,
    /// The access token expired but can be renewed without the user.
    Refresh,
    /// No usable cache: ask the user in the browser.
    Consent,
}

impl TokenAction {
    /// Decides how to get a token from the cache contents.
    ///
    /// A cache granted for other scopes counts as unusable.
    pub fn for_cache(cached: Option<&TokenInfo>, scopes: &[String]) -> Self {
        match cached {
            Some(tokens) if !tokens.has_scopes(scopes) => Self::Consent,
            Some(tokens) if !tokens.is_expired() => Self::UseCached,
            Some(tokens) if tokens.can_refresh() => Self::Refresh,
            _ => Self::Consent,
        }
    }
}

/// Token cache plus the client secret needed to renew it.
#[derive(Debug)]
pub struct CredentialStore {
    config: GoogleConfig,
    storage: TokenStorage,
}

impl CredentialStore {
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate()?;
        let storage = TokenStorage::new(&config.token_path);
        Ok(Self { config, storage })
    }

    /// Returns a valid token, refreshing or asking for consent as needed.
    ///
    /// A cache that cannot be read is treated as missing.
    pub async fn obtain(&self) -> ProviderResult<TokenInfo> {
        let cached = self.storage.load().unwrap_or_else(|e| {
            warn!("ignoring unreadable token cache: {}", e);
            None
        });

        let tokens = match (TokenAction::for_cache(cached.as_ref(), &self.config.scopes), cached) {
            (TokenAction::UseCached, Some(tokens)) => {
                debug!("using cached access token");
                return Ok(tokens);
            }
            (TokenAction::Refresh, Some(tokens)) => match self.oauth()?.refresh(tokens).await {
                Ok(tokens) => tokens,
                Err(e) if e.is_authentication() => {
                    warn!("token refresh rejected, asking for consent again: {}", e);
                    self.consent().await?
                }
                Err(e) => return Err(e),
            },
            _ => self.consent().await?,
        };

        self.storage.save(&tokens)?;
        Ok(tokens)
    }

    /// Builds a calendar client for the primary calendar.
    pub async fn connect(&self) -> ProviderResult<GoogleCalendar> {
        let tokens = self.obtain().await?;
        GoogleCalendar::new(
            tokens.access_token,
            self.config.timeout,
            &self.config.user_agent,
        )
    }

    async fn consent(&self) -> ProviderResult<TokenInfo> {
        info!(
            "no usable token in {}, starting browser consent",
            self.storage.path().display()
        );
        self.oauth()?
            .authorize(&self.config.scopes, self.config.loopback_port_range)
            .await
    }

    fn oauth(&self) -> ProviderResult<OAuthClient> {
        let credentials = OAuthCredentials::from_file(&self.config.credentials_path)?;
        OAuthClient::new(credentials, self.config.timeout)
    }
}
