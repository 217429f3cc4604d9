//! Scriptable downloader for controller and router tests.

use super::{Downloader, Video, VideoRequest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    passwords: HashMap<String, String>,
    failing: HashMap<String, String>,
    requests: Vec<VideoRequest>,
    loggers_attached: usize,
}

/// In-memory downloader.
///
/// Every URL resolves to `https://cdn.example/<format>` unless it was marked
/// as password protected or failing. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct MockDownloader {
    state: Arc<Mutex<MockState>>,
}

impl MockDownloader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Require `password` for `url`.
    pub(crate) fn protect(&self, url: &str, password: &str) {
        self.state
            .lock()
            .unwrap()
            .passwords
            .insert(url.to_string(), password.to_string());
    }

    /// Make lookups for `url` fail with `message`.
    pub(crate) fn fail(&self, url: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(url.to_string(), message.to_string());
    }

    pub(crate) fn requests(&self) -> Vec<VideoRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn loggers_attached(&self) -> usize {
        self.state.lock().unwrap().loggers_attached
    }
}

#[async_trait]
impl Downloader for MockDownloader {
    async fn video(&self, request: &VideoRequest) -> crate::Result<Video> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if let Some(message) = state.failing.get(&request.url) {
            return Err(crate::Error::Other(message.clone()));
        }

        if let Some(expected) = state.passwords.get(&request.url) {
            match &request.password {
                None => {
                    return Err(crate::Error::PasswordRequired {
                        url: request.url.clone(),
                    });
                }
                Some(given) if given != expected => {
                    return Err(crate::Error::WrongPassword {
                        url: request.url.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Video {
            id: Some("mock".to_string()),
            title: format!("Video at {}", request.url),
            webpage_url: Some(request.url.clone()),
            url: Some(format!("https://cdn.example/{}", request.format)),
            ext: Some("mp4".to_string()),
            format_id: Some(request.format.clone()),
            protocol: Some("https".to_string()),
            duration: None,
            thumbnail: None,
        })
    }

    fn with_logger(&self, _logger: tracing::Span) -> Arc<dyn Downloader> {
        self.state.lock().unwrap().loggers_attached += 1;
        Arc::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
