use super::*;
use crate::config::Config;
use crate::controller::{ErrorPage, IndexInfo};
use crate::downloader::test_helpers::MockDownloader;
use crate::error::ApiError;
use crate::locale::LocaleManager;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tower_sessions::cookie::Cookie;

const VIDEO: &str = "https://example.com/watch/42";

/// Router backed by a mock downloader and an in-memory session store
fn create_test_app(downloader: &MockDownloader) -> (Router, MemorySessionStore) {
    let config = Config::default();
    let store = MemorySessionStore::new();
    let services = Services::builder()
        .locale(Arc::new(LocaleManager::new(&config.locale)))
        .config(Arc::new(config))
        .downloader(Arc::new(downloader.clone()))
        .logger(tracing::Span::none())
        .error_renderer(Arc::new(ErrorPage))
        .build()
        .unwrap();

    let app = create_router(AppState::new(&services, store.clone()));
    (app, store)
}

/// Minimal cookie jar: remembers the session cookie between requests
#[derive(Default)]
struct Client {
    cookie: Option<String>,
}

impl Client {
    async fn send(&mut self, app: &Router, mut request: Request) -> Response {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let parsed = Cookie::parse(set_cookie.to_str().unwrap().to_string()).unwrap();
            self.cookie = Some(format!("{}={}", parsed.name(), parsed.value()));
        }
        response
    }

    async fn get(&mut self, app: &Router, uri: &str) -> Response {
        self.send(app, Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_form(&mut self, app: &Router, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(app, request).await
    }
}

fn download_uri(url: &str) -> String {
    format!(
        "/download?url={}",
        url::form_urlencoded::byte_serialize(url.as_bytes()).collect::<String>()
    )
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(&MockDownloader::new());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().get(header::SET_COOKIE).is_none(),
        "health checks should not open sessions"
    );

    let body: serde_json::Value = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_index_opens_a_session() {
    let (app, store) = create_test_app(&MockDownloader::new());
    let mut client = Client::default();

    let response = client.get(&app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(client.cookie.is_some());

    let info: IndexInfo = json_body(response).await;
    assert_eq!(info.locale, "en_US");
    assert_eq!(info.downloader, "mock");
    assert!(info.default_format.contains("[protocol=https]"));

    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_session_cookie_is_refreshed_on_every_response() {
    let (app, store) = create_test_app(&MockDownloader::new());
    let mut client = Client::default();

    client.get(&app, "/").await;
    let first = client.cookie.clone().unwrap();

    let response = client.get(&app, "/").await;
    let refreshed = Cookie::parse(
        response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string(),
    )
    .unwrap();

    assert_eq!(format!("{}={}", refreshed.name(), refreshed.value()), first);
    assert_eq!(
        refreshed.max_age(),
        Some(time::Duration::seconds(86400)),
        "inactivity expiry restarts with each request"
    );
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_locale_switch_persists_in_session() {
    let (app, _) = create_test_app(&MockDownloader::new());
    let mut client = Client::default();

    let response = client.get(&app, "/locale/fr_FR").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let info: IndexInfo = json_body(client.get(&app, "/").await).await;
    assert_eq!(info.locale, "fr_FR");

    // Another client keeps the default
    let info: IndexInfo = json_body(Client::default().get(&app, "/").await).await;
    assert_eq!(info.locale, "en_US");
}

#[tokio::test]
async fn test_unsupported_locale_is_rejected() {
    let (app, _) = create_test_app(&MockDownloader::new());

    let response = Client::default().get(&app, "/locale/xx_XX").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let api_error: ApiError = json_body(response).await;
    assert_eq!(api_error.error.code, "unsupported_locale");
}

#[tokio::test]
async fn test_download_redirects_with_requested_format() {
    let downloader = MockDownloader::new();
    let (app, _) = create_test_app(&downloader);

    let uri = format!("{}&format=worst", download_uri(VIDEO));
    let response = Client::default().get(&app, &uri).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://cdn.example/worst"
    );
    assert_eq!(downloader.requests()[0].url, VIDEO);
}

#[tokio::test]
async fn test_download_uses_http_default_format() {
    let downloader = MockDownloader::new();
    let (app, _) = create_test_app(&downloader);

    let response = Client::default().get(&app, &download_uri(VIDEO)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        downloader.requests()[0].format,
        "best[protocol=https]/best[protocol=http]/\
         bestvideo[protocol=https]/bestvideo[protocol=http]"
    );
}

#[tokio::test]
async fn test_password_flow_across_requests() {
    let downloader = MockDownloader::new();
    downloader.protect(VIDEO, "hunter2");
    let (app, _) = create_test_app(&downloader);
    let mut client = Client::default();
    let uri = download_uri(VIDEO);

    // 1. No password yet
    let response = client.get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let api_error: ApiError = json_body(response).await;
    assert_eq!(api_error.error.code, "password_required");

    // 2. Wrong password
    let response = client.post_form(&app, &uri, "password=nope").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let api_error: ApiError = json_body(response).await;
    assert_eq!(api_error.error.code, "wrong_password");

    // 3. Right password
    let response = client.post_form(&app, &uri, "password=hunter2").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // 4. Remembered for exactly one more request
    let response = client.get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client.get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let passwords: Vec<_> = downloader
        .requests()
        .into_iter()
        .map(|r| r.password)
        .collect();
    assert_eq!(
        passwords,
        vec![
            None,
            Some("nope".to_string()),
            Some("hunter2".to_string()),
            Some("hunter2".to_string()),
            None,
        ]
    );
}

#[tokio::test]
async fn test_password_is_not_shared_between_clients() {
    let downloader = MockDownloader::new();
    downloader.protect(VIDEO, "hunter2");
    let (app, _) = create_test_app(&downloader);
    let uri = download_uri(VIDEO);

    let mut alice = Client::default();
    let response = alice.post_form(&app, &uri, "password=hunter2").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = Client::default().get(&app, &uri).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_download_without_url_shows_error_page() {
    let (app, _) = create_test_app(&MockDownloader::new());

    let response = Client::default().get(&app, "/download").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let api_error: ApiError = json_body(response).await;
    assert_eq!(api_error.error.code, "display_error");
    assert!(api_error.error.message.contains("no URL given"));
}

#[tokio::test]
async fn test_json_endpoint_returns_metadata() {
    let (app, _) = create_test_app(&MockDownloader::new());

    let uri = format!(
        "/json?url={}&format=best",
        url::form_urlencoded::byte_serialize(VIDEO.as_bytes()).collect::<String>()
    );
    let response = Client::default().get(&app, &uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let video: crate::downloader::Video = json_body(response).await;
    assert_eq!(video.media_url(), Some("https://cdn.example/best"));
}

#[tokio::test]
async fn test_json_endpoint_reports_password_required() {
    let downloader = MockDownloader::new();
    downloader.protect(VIDEO, "hunter2");
    let (app, _) = create_test_app(&downloader);

    let uri = format!(
        "/json?url={}",
        url::form_urlencoded::byte_serialize(VIDEO.as_bytes()).collect::<String>()
    );
    let response = Client::default().get(&app, &uri).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_server_starts_and_stops() {
    let mut config = Config::default();
    config.http.bind_address = "127.0.0.1:0".parse().unwrap();
    config.downloader.search_path = false;

    let handle = tokio::spawn(start_server(config));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished(), "server should still be serving");

    handle.abort();
}
