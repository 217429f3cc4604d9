//! Downloader backed by an external youtube-dl compatible binary

use super::parser::{ExitStatus, parse_video_output};
use super::{Downloader, Video, VideoRequest};
use crate::error::DownloaderError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;
use tracing::Instrument;

/// Binary names probed in PATH, in order of preference
const BINARY_CANDIDATES: &[&str] = &["yt-dlp", "youtube-dl"];

/// Downloader that shells out to `yt-dlp` / `youtube-dl`
///
/// Each lookup runs `<binary> <params> --dump-single-json --format <format> <url>`
/// and parses the JSON document printed on stdout.
#[derive(Clone)]
pub struct CliDownloader {
    binary_path: PathBuf,
    params: Vec<String>,
    logger: tracing::Span,
}

impl CliDownloader {
    /// Create a downloader with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            params: Vec::new(),
            logger: tracing::Span::none(),
        }
    }

    /// Attempt to find a supported binary in PATH
    pub fn from_path() -> Option<Self> {
        BINARY_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
    }

    /// Extra arguments passed before the per-request ones
    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    fn args(&self, request: &VideoRequest) -> Vec<String> {
        let mut args = self.params.clone();
        args.push("--dump-single-json".to_string());
        args.push("--format".to_string());
        args.push(request.format.clone());
        if let Some(password) = &request.password {
            args.push("--video-password".to_string());
            args.push(password.clone());
        }
        args.push(request.url.clone());
        args
    }

    async fn run(&self, request: &VideoRequest) -> crate::Result<Video> {
        let output = Command::new(&self.binary_path)
            .args(self.args(request))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DownloaderError::ExecutionFailed {
                binary: self.binary_path.clone(),
                reason: e.to_string(),
            })?;

        let exit_status = ExitStatus::from(output.status);
        tracing::debug!(?exit_status, "Downloader process finished");

        parse_video_output(&request.url, &output.stdout, &output.stderr, exit_status)
    }
}

#[async_trait]
impl Downloader for CliDownloader {
    async fn video(&self, request: &VideoRequest) -> crate::Result<Video> {
        let span = tracing::info_span!(
            parent: &self.logger,
            "downloader",
            url = %request.url,
            format = %request.format,
        );

        self.run(request).instrument(span).await
    }

    fn with_logger(&self, logger: tracing::Span) -> Arc<dyn Downloader> {
        Arc::new(Self {
            logger,
            ..self.clone()
        })
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}
