//! # video-dl-web
//!
//! Request handling base for a video download web front end.
//!
//! ## Overview
//!
//! - **Controllers** share a [`controller::BaseController`] that resolves the
//!   requested format and password and owns a session segment
//! - **Sessions** come from `tower-sessions`, are split into isolated
//!   segments with single-use flash values
//! - **Downloaders** are opaque: anything implementing
//!   [`downloader::Downloader`], usually an external youtube-dl compatible
//!   binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use video_dl_web::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     video_dl_web::logging::init_logging()?;
//!
//!     let config = Config {
//!         stream: false,
//!         default_format: "best/bestvideo".to_string(),
//!         ..Default::default()
//!     };
//!
//!     // Serves until SIGTERM/SIGINT
//!     video_dl_web::api::start_server(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP server module
pub mod api;
/// Configuration types
pub mod config;
/// Request handlers
pub mod controller;
/// Video metadata backends
pub mod downloader;
/// Error types
pub mod error;
/// Per-session locale selection
pub mod locale;
/// Tracing subscriber setup
pub mod logging;
/// Server-side sessions
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use controller::{BaseController, ErrorRenderer, RequestParams, Services, ServicesBuilder};
pub use downloader::{Downloader, Video, VideoRequest};
pub use error::{ApiError, DownloaderError, Error, ErrorDetail, Result, ToHttpStatus};
pub use locale::LocaleManager;
pub use session::{MemorySessionStore, Segment, Session};

/// Wait for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub(crate) async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGTERM handler, waiting for SIGINT only"
            );
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGINT handler, waiting for SIGTERM only"
            );
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
