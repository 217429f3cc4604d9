//! Video metadata as JSON

use super::{BaseController, RequestParams, Services};
use crate::session::Session;
use axum::{
    Json,
    response::{IntoResponse, Response},
};

/// Answers with the metadata the downloader reports for a video
///
/// Unlike [`super::DownloadController`], failures are returned as structured
/// error bodies with their own status code rather than an error page.
pub struct JsonController {
    base: BaseController,
}

impl JsonController {
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

    /// Handle `GET|POST /json?url=...&format=...`
    pub async fn json(&self, session: &Session, params: &RequestParams) -> Response {
        match self.base.video(session, params).await {
            Ok(video) => Json(video).into_response(),
            Err(e) => {
                tracing::debug!(parent: self.base.logger(), error = %e, "Lookup failed");
                e.into_response()
            }
        }
    }
}
