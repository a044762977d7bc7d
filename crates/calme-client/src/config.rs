//! Client configuration.
//!
//! All settings live in an optional `config.toml`, by default at
//! `~/.config/calme/config.toml`. Every key has a default, so a missing
//! file and an empty file behave the same.

use std::path::{Path, PathBuf};
use std::time::Duration;

use calme_providers::google::GoogleConfig;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Configuration for the calme client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Debug logging, same as `--debug`.
    pub debug: bool,

    /// Google Calendar settings.
    pub google: GoogleSettings,

    /// Display settings.
    pub display: DisplaySettings,
}

/// `[google]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleSettings {
    /// Client-secret JSON from Google Cloud Console.
    pub credentials_path: Option<PathBuf>,

    /// Token cache file.
    pub token_path: Option<PathBuf>,

    /// IANA zone new events are created in.
    pub timezone: Option<String>,

    /// Inclusive port range for the OAuth loopback listener.
    pub loopback_port_range: Option<(u16, u16)>,

    /// HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[display]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    /// ANSI colors on the terminal.
    pub color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { color: true }
    }
}

impl ClientConfig {
    /// Loads the configuration from `path` if given, else from the default
    /// location. Only an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!("no config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calme")
            .join("config.toml")
    }

    /// Builds the provider configuration, falling back to the files next to
    /// the executable.
    pub fn google_config(&self) -> ClientResult<GoogleConfig> {
        let settings = &self.google;
        let mut config = GoogleConfig::new();

        if let Some(path) = &settings.credentials_path {
            config = config.with_credentials_path(path);
        }
        if let Some(path) = &settings.token_path {
            config = config.with_token_path(path);
        }
        if let Some((start, end)) = settings.loopback_port_range {
            config = config.with_loopback_port_range(start, end);
        }
        if let Some(secs) = settings.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config
            .validate()
            .map_err(|e| ClientError::Config(e.message().to_string()))?;
        Ok(config)
    }

    /// Resolves the zone events are created in: the configured one, else
    /// the system zone, else UTC.
    pub fn time_zone(&self) -> ClientResult<Tz> {
        if let Some(name) = &self.google.timezone {
            return name.parse::<Tz>().map_err(|_| {
                ClientError::Config(format!("unknown time zone {:?} in [google] timezone", name))
            });
        }

        match iana_time_zone::get_timezone() {
            Ok(name) => Ok(name.parse::<Tz>().unwrap_or_else(|_| {
                warn!("system time zone {:?} is not an IANA name, using UTC", name);
                Tz::UTC
            })),
            Err(e) => {
                warn!("cannot determine system time zone, using UTC: {}", e);
                Ok(Tz::UTC)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ClientConfig::parse("").unwrap();
        assert!(!config.debug);
        assert!(config.display.color);
        assert!(config.google.timezone.is_none());

        let google = config.google_config().unwrap();
        assert_eq!(google.loopback_port_range, (0, 0));
        assert_eq!(
            google.timeout,
            Duration::from_secs(GoogleConfig::DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn full_config() {
        let config = ClientConfig::parse(
            r#"
debug = true

[google]
credentials_path = "/etc/calme/credentials.json"
token_path = "/var/lib/calme/token.json"
timezone = "America/Toronto"
loopback_port_range = [8080, 8090]
timeout_secs = 10

[display]
color = false
"#,
        )
        .unwrap();

        assert!(config.debug);
        assert!(!config.display.color);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::America::Toronto);

        let google = config.google_config().unwrap();
        assert_eq!(
            google.credentials_path,
            PathBuf::from("/etc/calme/credentials.json")
        );
        assert_eq!(google.token_path, PathBuf::from("/var/lib/calme/token.json"));
        assert_eq!(google.loopback_port_range, (8080, 8090));
        assert_eq!(google.timeout, Duration::from_secs(10));
    }

    #[test]
    fn unknown_time_zone_is_a_config_error() {
        let config = ClientConfig::parse("[google]\ntimezone = \"Mars/Olympus\"\n").unwrap();
        let err = config.time_zone().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn system_time_zone_fallback_never_fails() {
        assert!(ClientConfig::default().time_zone().is_ok());
    }

    #[test]
    fn reversed_port_range_is_rejected() {
        let config = ClientConfig::parse("[google]\nloopback_port_range = [9000, 8000]\n").unwrap();
        assert!(matches!(
            config.google_config().unwrap_err(),
            ClientError::Config(_)
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ClientConfig::parse("[google]\ncalendar_id = \"work\"\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ncolor = false\n").unwrap();

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert!(!config.display.color);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = \"maybe\"\n").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        assert!(ClientConfig::default_path().ends_with("calme/config.toml"));
    }
}
