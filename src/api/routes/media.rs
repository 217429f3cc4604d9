//! Media handlers: redirect to the media file, or describe the video.

use crate::api::AppState;
use crate::controller::RequestParams;
use crate::session::Session;
use axum::{extract::State, response::Response};

/// GET|POST /download - Redirect to the media URL
///
/// Query: `url` (required), `format` (optional).
/// Form body: `password` (optional).
pub async fn download(
    State(state): State<AppState>,
    session: Session,
    params: RequestParams,
) -> Response {
    state.download.download(&session, &params).await
}

/// GET|POST /json - Video metadata
///
/// Same parameters as `/download`.
pub async fn video_json(
    State(state): State<AppState>,
    session: Session,
    params: RequestParams,
) -> Response {
    state.json.json(&session, &params).await
}
