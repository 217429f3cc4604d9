//! Redirects to the media file of a video

use super::{BaseController, RequestParams, Services};
use crate::error::{DownloaderError, Error};
use crate::session::Session;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Sends the browser straight to the media URL of the requested video
///
/// Protected videos answer 403 with a `password_required` body; the client
/// resubmits with a `password` form field, which is remembered for the
/// next request of the same URL.
pub struct DownloadController {
    base: BaseController,
}

impl DownloadController {
    /// Create the controller
    pub fn new(services: &Services) -> Self {
        Self {
            base: BaseController::new::<Self>(services),
        }
    }

    /// Shared controller state
    pub fn base(&self) -> &BaseController {
        &self.base
    }

    /// Handle `GET|POST /download?url=...&format=...`
    pub async fn download(&self, session: &Session, params: &RequestParams) -> Response {
        let result = self.base.video(session, params).await.and_then(|video| {
            let url = params.query("url").unwrap_or_default();
            video.media_url().map(str::to_owned).ok_or_else(|| {
                Error::Downloader(DownloaderError::NoMediaUrl {
                    url: url.to_string(),
                })
            })
        });

        match result {
            Ok(media_url) => self.redirect(params, &media_url),
            Err(e) => self.error(params, e),
        }
    }

    fn redirect(&self, params: &RequestParams, media_url: &str) -> Response {
        match HeaderValue::from_str(media_url) {
            Ok(location) => {
                tracing::debug!(parent: self.base.logger(), media_url, "Redirecting to media");
                (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
            }
            Err(_) => self
                .base
                .display_error(params, "The downloader returned an unusable media URL"),
        }
    }

    fn error(&self, params: &RequestParams, error: Error) -> Response {
        match error {
            Error::PasswordRequired { .. } | Error::WrongPassword { .. } => {
                tracing::info!(parent: self.base.logger(), error = %error, "Password needed");
                error.into_response()
            }
            Error::SessionUnavailable(_) => {
                tracing::error!(parent: self.base.logger(), error = %error, "Session lost");
                error.into_response()
            }
            other => {
                tracing::warn!(parent: self.base.logger(), error = %other, "Download failed");
                self.base.display_error(params, &other.to_string())
            }
        }
    }
}
