//! Configuration types for video-dl-web

use crate::downloader::{CliDownloader, Downloader, NoOpDownloader};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf, sync::Arc, time::Duration};

/// Main configuration
///
/// Every field has a default, so an empty TOML file is a valid configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Stream media through this server instead of redirecting (default: false)
    ///
    /// When disabled, controllers rewrite their default format so that the
    /// downloader only picks formats reachable over plain HTTP(S).
    #[serde(default)]
    pub stream: bool,

    /// Format used when a request does not ask for one (default: "best/bestvideo")
    #[serde(default = "default_format")]
    pub default_format: String,

    /// External downloader settings
    #[serde(default)]
    pub downloader: DownloaderConfig,

    /// Session cookie and lifetime settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Locale settings
    #[serde(default)]
    pub locale: LocaleConfig,

    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stream: false,
            default_format: default_format(),
            downloader: DownloaderConfig::default(),
            session: SessionConfig::default(),
            locale: LocaleConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// External downloader binary configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Path to a youtube-dl compatible binary (auto-detected if None)
    #[serde(default)]
    pub binary_path: Option<PathBuf>,

    /// Whether to search PATH for the binary if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Extra arguments passed on every invocation
    #[serde(default = "default_downloader_params")]
    pub params: Vec<String>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            search_path: true,
            params: default_downloader_params(),
        }
    }
}

/// Session configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie (default: "video_dl_session")
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Inactivity after which a session expires, in seconds (default: 86400)
    #[serde(default = "default_session_ttl", with = "duration_serde")]
    pub ttl: Duration,

    /// Interval between deletions of expired sessions in seconds (default: 300)
    #[serde(default = "default_cleanup_interval", with = "duration_serde")]
    pub cleanup_interval: Duration,

    /// Mark the cookie `Secure` (default: false)
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl: default_session_ttl(),
            cleanup_interval: default_cleanup_interval(),
            secure_cookie: false,
        }
    }
}

/// Locale configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale used when the session has none (default: "en_US")
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Locales users may switch to
    #[serde(default = "default_supported_locales")]
    pub supported: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            supported: default_supported_locales(),
        }
    }
}

/// HTTP listener configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).map_err(|e| Error::Config {
            message: e.message().to_string(),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.default_format.trim().is_empty() {
            return Err(config_error("default format must not be empty", "default_format"));
        }

        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(config_error(
                "cookie name must be non-empty and contain only [A-Za-z0-9_-]",
                "session.cookie_name",
            ));
        }

        if self.session.ttl.is_zero() {
            return Err(config_error("session TTL must be positive", "session.ttl"));
        }

        if self.session.cleanup_interval.is_zero() {
            return Err(config_error(
                "session cleanup interval must be positive",
                "session.cleanup_interval",
            ));
        }

        if !self
            .locale
            .supported
            .iter()
            .any(|l| l == &self.locale.default_locale)
        {
            return Err(config_error(
                format!(
                    "default locale {} is not in the supported list",
                    self.locale.default_locale
                ),
                "locale.default_locale",
            ));
        }

        Ok(())
    }

    /// Build a downloader from the configured binary settings
    ///
    /// Falls back to [`NoOpDownloader`] when no binary is configured and none
    /// can be found in PATH.
    pub fn downloader(&self) -> Arc<dyn Downloader> {
        let cli = match &self.downloader.binary_path {
            Some(path) => Some(CliDownloader::new(path.clone())),
            None if self.downloader.search_path => CliDownloader::from_path(),
            None => None,
        };

        match cli {
            Some(cli) => Arc::new(cli.with_params(self.downloader.params.clone())),
            None => {
                tracing::warn!("No downloader binary available, video requests will fail");
                Arc::new(NoOpDownloader)
            }
        }
    }

    /// Rewrite a format selector so every alternative is restricted to HTTP(S)
    ///
    /// Each `/`-separated alternative `f` becomes `f[protocol=https]/f[protocol=http]`.
    pub fn add_http_to_format(format: &str) -> String {
        format
            .split('/')
            .flat_map(|sub| [format!("{sub}[protocol=https]"), format!("{sub}[protocol=http]")])
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn config_error(message: impl Into<String>, key: &str) -> Error {
    Error::Config {
        message: message.into(),
        key: Some(key.to_string()),
    }
}

fn default_format() -> String {
    "best/bestvideo".to_string()
}

fn default_true() -> bool {
    true
}

fn default_downloader_params() -> Vec<String> {
    ["--no-warnings", "--ignore-errors", "--flat-playlist", "--restrict-filenames", "--no-playlist"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_cookie_name() -> String {
    "video_dl_session".to_string()
}

fn default_session_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(300)
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_supported_locales() -> Vec<String> {
    ["en_US", "fr_FR", "de_DE", "es_ES", "pt_BR"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
