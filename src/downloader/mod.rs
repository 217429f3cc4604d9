//! Video downloader backends
//!
//! Controllers never talk to a concrete extractor. They hold an
//! `Arc<dyn Downloader>` and ask it for video metadata given a page URL,
//! a format selector and an optional password.
//!
//! - [`CliDownloader`]: runs an external youtube-dl compatible binary
//! - [`NoOpDownloader`]: stub used when no binary is available
//!
//! ```no_run
//! use video_dl_web::downloader::{CliDownloader, Downloader, VideoRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = CliDownloader::from_path().expect("youtube-dl not found");
//! let video = downloader
//!     .video(&VideoRequest::new("https://example.com/watch/1", "best"))
//!     .await?;
//! println!("{}", video.title);
//! # Ok(())
//! # }
//! ```

mod cli;
mod noop;
mod parser;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use cli::CliDownloader;
pub use noop::NoOpDownloader;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Parameters for a single metadata lookup
#[derive(Clone, PartialEq, Eq)]
pub struct VideoRequest {
    /// Page URL of the video
    pub url: String,
    /// Format selector
    pub format: String,
    /// Password for protected videos
    pub password: Option<String>,
}

impl VideoRequest {
    /// Create a request without a password
    pub fn new(url: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: format.into(),
            password: None,
        }
    }

    /// Attach a password
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for VideoRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoRequest")
            .field("url", &self.url)
            .field("format", &self.format)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Video metadata as reported by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Extractor-specific identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Video title
    pub title: String,
    /// Canonical page URL
    #[serde(default)]
    pub webpage_url: Option<String>,
    /// Direct media URL of the selected format
    #[serde(default)]
    pub url: Option<String>,
    /// File extension of the selected format
    #[serde(default)]
    pub ext: Option<String>,
    /// Identifier of the selected format
    #[serde(default)]
    pub format_id: Option<String>,
    /// Transport protocol of the selected format (https, m3u8, ...)
    #[serde(default)]
    pub protocol: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    /// Thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Video {
    /// Direct media URL, if the selected format has exactly one
    pub fn media_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Trait for video metadata backends
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Look up metadata for the video at `request.url`
    ///
    /// # Errors
    ///
    /// - [`crate::Error::PasswordRequired`] when the video is protected and
    ///   no password was given
    /// - [`crate::Error::WrongPassword`] when the password was rejected
    /// - [`crate::Error::Downloader`] when the backend fails
    async fn video(&self, request: &VideoRequest) -> crate::Result<Video>;

    /// Return a handle to this backend that logs under `logger`
    fn with_logger(&self, logger: tracing::Span) -> Arc<dyn Downloader>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
