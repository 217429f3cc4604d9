//! Session cookie layer, request counting and expired record deletion

use super::{MemorySessionStore, Session, begin_request};
use crate::config::SessionConfig;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};
use tower_sessions_core::session_store::ExpiredDeletion;

/// Layer attaching a [`Session`] to every request
///
/// The cookie is named after [`SessionConfig::cookie_name`], is `HttpOnly`,
/// `SameSite=Lax` and scoped to `/`. Sessions expire after
/// [`SessionConfig::ttl`] of inactivity.
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use video_dl_web::config::SessionConfig;
/// use video_dl_web::session::{MemorySessionStore, count_request, session_layer};
///
/// let store = MemorySessionStore::new();
/// let app: Router = Router::new()
///     .route("/", get(|| async { "hello" }))
///     .layer(middleware::from_fn(count_request))
///     .layer(session_layer(store, &SessionConfig::default()));
/// ```
pub fn session_layer(
    store: MemorySessionStore,
    config: &SessionConfig,
) -> SessionManagerLayer<MemorySessionStore> {
    let inactivity = time::Duration::try_from(config.ttl).unwrap_or(time::Duration::MAX);

    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookie)
        .with_expiry(Expiry::OnInactivity(inactivity))
}

/// Number the current request of its session
///
/// Must run inside [`session_layer`]. Flash values age by these numbers.
/// Since the counter changes on every request, the cookie and its expiry are
/// refreshed on every response.
pub async fn count_request(session: Session, request: Request, next: Next) -> Response {
    if let Err(e) = begin_request(&session).await {
        tracing::error!(error = %e, "Could not start session request");
        return e.into_response();
    }

    next.run(request).await
}

/// Periodically delete expired records from `store`
///
/// The task runs until aborted, or stops early (with an error log) if the
/// store fails.
pub fn spawn_expired_deletion(store: MemorySessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(period_secs = period.as_secs(), "Expired session deletion started");
        if let Err(e) = store.continuously_delete_expired(period).await {
            tracing::error!(error = %e, "Expired session deletion stopped");
        }
    })
}
