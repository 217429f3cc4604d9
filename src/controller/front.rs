//! Front page, locale switching and the error page

use super::{BaseController, ErrorRenderer, RequestParams, Services};
use crate::error::{ApiError, Result};
use crate::session::Session;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error page shown by [`FrontController`]
///
/// A 500 response with body
/// `{"error": {"code": "display_error", "message": <message>}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorPage;

impl ErrorRenderer for ErrorPage {
    fn render(&self, _params: &RequestParams, message: &str) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("display_error", message)),
        )
            .into_response()
    }
}

/// What the front page shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Locale of the current session
    pub locale: String,
    /// Locales the user may switch to
    pub supported_locales: Vec<String>,
    /// Format used when none is requested
    pub default_format: String,
    /// Whether media is streamed through the server
    pub stream: bool,
    /// Name of the downloader backend
    pub downloader: String,
}

/// Handles the front page and locale selection
pub struct FrontController {
    base: BaseController,
}

impl FrontController {
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

    /// Front page data for `session`
    pub async fn index(&self, session: &Session) -> Result<IndexInfo> {
        let locales = self.base.locale_manager();
        Ok(IndexInfo {
            locale: locales.locale(session).await?,
            supported_locales: locales.supported().to_vec(),
            default_format: self.base.default_format().to_string(),
            stream: self.base.config().stream,
            downloader: self.base.downloader().name().to_string(),
        })
    }

    /// Switch `session` to `locale`
    pub async fn locale(&self, session: &Session, locale: &str) -> Result<()> {
        self.base.locale_manager().set_locale(session, locale).await?;
        tracing::info!(parent: self.base.logger(), locale, "Locale selected");
        Ok(())
    }
}
