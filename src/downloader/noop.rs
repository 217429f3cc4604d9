//! No-op downloader for graceful degradation

use super::{Downloader, Video, VideoRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Downloader used when no extractor binary is available
///
/// Every lookup fails with `Error::NotSupported`, which controllers render
/// through the error page like any other failure.
pub struct NoOpDownloader;

#[async_trait]
impl Downloader for NoOpDownloader {
    async fn video(&self, _request: &VideoRequest) -> crate::Result<Video> {
        Err(crate::Error::NotSupported(
            "video lookup requires yt-dlp or youtube-dl. \
             Configure downloader.binary_path or ensure one is in PATH."
                .into(),
        ))
    }

    fn with_logger(&self, _logger: tracing::Span) -> Arc<dyn Downloader> {
        Arc::new(NoOpDownloader)
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
