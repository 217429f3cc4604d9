//! HTTP server module
//!
//! Wires the controllers into an axum router behind the session layer.

use crate::controller::Services;
use crate::session::{MemorySessionStore, count_request, spawn_expired_deletion};
use crate::{Config, Result};
use axum::{Router, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the router with all route definitions
///
/// # Routes
///
/// - `GET /` - Front page data (locale, supported locales, default format)
/// - `GET /locale/:locale` - Switch locale, redirect to `/`
/// - `GET|POST /download` - Redirect to the media URL of `?url=`
/// - `GET|POST /json` - Metadata of the video at `?url=`
/// - `GET /health` - Health check
///
/// Every route except `/health` runs inside a session.
pub fn create_router(state: AppState) -> Router {
    let sessions = state.sessions.clone();

    let session_routes = Router::new()
        .route("/", get(routes::index))
        .route("/locale/:locale", get(routes::set_locale))
        .route("/download", get(routes::download).post(routes::download))
        .route("/json", get(routes::video_json).post(routes::video_json))
        .layer(middleware::from_fn(count_request))
        .layer(sessions);

    Router::new()
        .route("/health", get(routes::health_check))
        .merge(session_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server on the configured bind address.
///
/// Builds the services and controllers from `config`, starts the periodic
/// deletion of expired sessions and serves until SIGTERM/SIGINT (Ctrl+C elsewhere).
///
/// # Example
///
/// ```no_run
/// use video_dl_web::Config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_file("video-dl-web.toml")?;
///
/// // Blocks until shutdown
/// video_dl_web::api::start_server(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: Config) -> Result<()> {
    let bind_address = config.http.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting HTTP server"
    );

    let store = MemorySessionStore::new();
    let deletion = spawn_expired_deletion(store.clone(), config.session.cleanup_interval);

    let services = Services::from_config(config);
    let app = create_router(AppState::new(&services, store));

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "HTTP server listening"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(crate::wait_for_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()));

    deletion.abort();
    tracing::info!("HTTP server stopped");
    served
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
