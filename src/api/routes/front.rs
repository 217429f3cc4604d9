//! Front page handlers

use crate::api::AppState;
use crate::controller::IndexInfo;
use crate::error::Result;
use crate::session::Session;
use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};

/// GET / - Front page data
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Json<IndexInfo>> {
    Ok(Json(state.front.index(&session).await?))
}

/// GET /locale/:locale - Switch locale and go back to the front page
pub async fn set_locale(
    State(state): State<AppState>,
    session: Session,
    Path(locale): Path<String>,
) -> Result<Redirect> {
    state.front.locale(&session, &locale).await?;
    Ok(Redirect::to("/"))
}
