//! Application state for the HTTP server

use crate::controller::{DownloadController, FrontController, JsonController, Services};
use crate::session::{MemorySessionStore, session_layer};
use std::sync::Arc;
use tower_sessions::SessionManagerLayer;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clones). Controllers are built once,
/// when the state is created.
#[derive(Clone)]
pub struct AppState {
    /// Front page and locale switching
    pub front: Arc<FrontController>,

    /// Media redirects
    pub download: Arc<DownloadController>,

    /// Video metadata
    pub json: Arc<JsonController>,

    /// Session cookie layer over the session store
    pub sessions: SessionManagerLayer<MemorySessionStore>,
}

impl AppState {
    /// Build every controller from `services`, keeping sessions in `store`
    pub fn new(services: &Services, store: MemorySessionStore) -> Self {
        Self {
            front: Arc::new(FrontController::new(services)),
            download: Arc::new(DownloadController::new(services)),
            json: Arc::new(JsonController::new(services)),
            sessions: session_layer(store, &services.config.session),
        }
    }
}
