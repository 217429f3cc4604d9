//! Request handlers
//!
//! Every concrete controller embeds a [`BaseController`], built once from the
//! shared [`Services`]. The base resolves what most handlers need per request:
//!
//! - the session segment owned by the controller type
//! - the effective format ([`BaseController::get_format`])
//! - the effective password, remembered for one round trip
//!   ([`BaseController::get_password`])
//! - user-facing error pages ([`BaseController::display_error`])

mod download;
mod front;
mod json;
mod request;

pub use download::DownloadController;
pub use front::{ErrorPage, FrontController, IndexInfo};
pub use json::JsonController;
pub use request::RequestParams;

use crate::config::Config;
use crate::downloader::{Downloader, Video, VideoRequest};
use crate::error::{Error, Result};
use crate::locale::LocaleManager;
use crate::session::{Segment, Session};
use axum::response::Response;
use std::sync::Arc;
use tracing::{Instrument, Span};
use url::Url;

/// Renders an error message for the user
pub trait ErrorRenderer: Send + Sync {
    /// Build the response shown for `message`
    ///
    /// Must not fail: this is the last resort of every handler.
    fn render(&self, params: &RequestParams, message: &str) -> Response;
}

/// Services shared by all controllers
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,
    /// Per-session locale selection
    pub locale: Arc<LocaleManager>,
    /// Video metadata backend
    pub downloader: Arc<dyn Downloader>,
    /// Parent span of every controller
    pub logger: Span,
    /// Renderer used by [`BaseController::display_error`]
    pub error_renderer: Arc<dyn ErrorRenderer>,
}

impl Services {
    /// Start building services by hand
    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::default()
    }

    /// Derive every service from `config`
    ///
    /// The downloader comes from [`Config::downloader`] and errors are
    /// rendered by the front controller's [`ErrorPage`].
    pub fn from_config(config: Config) -> Self {
        let locale = LocaleManager::new(&config.locale);
        let downloader = config.downloader();

        Self {
            config: Arc::new(config),
            locale: Arc::new(locale),
            downloader,
            logger: tracing::info_span!("video_dl_web"),
            error_renderer: Arc::new(ErrorPage),
        }
    }
}

/// Builder for [`Services`]
///
/// ```
/// use video_dl_web::controller::{ErrorPage, Services};
/// use video_dl_web::downloader::NoOpDownloader;
/// use video_dl_web::{Config, Error, LocaleManager};
/// use std::sync::Arc;
///
/// let config = Config::default();
/// let result = Services::builder()
///     .locale(Arc::new(LocaleManager::new(&config.locale)))
///     .config(Arc::new(config))
///     .downloader(Arc::new(NoOpDownloader))
///     .error_renderer(Arc::new(ErrorPage))
///     .build();
///
/// assert!(matches!(result, Err(Error::DependencyMissing("logger"))));
/// ```
#[derive(Default)]
pub struct ServicesBuilder {
    config: Option<Arc<Config>>,
    locale: Option<Arc<LocaleManager>>,
    downloader: Option<Arc<dyn Downloader>>,
    logger: Option<Span>,
    error_renderer: Option<Arc<dyn ErrorRenderer>>,
}

impl ServicesBuilder {
    /// Set the configuration
    pub fn config(mut self, config: Arc<Config>) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the locale manager
    pub fn locale(mut self, locale: Arc<LocaleManager>) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Set the downloader
    pub fn downloader(mut self, downloader: Arc<dyn Downloader>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Set the parent logging span
    pub fn logger(mut self, logger: Span) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Set the error renderer
    pub fn error_renderer(mut self, renderer: Arc<dyn ErrorRenderer>) -> Self {
        self.error_renderer = Some(renderer);
        self
    }

    /// Assemble the services
    ///
    /// # Errors
    ///
    /// [`Error::DependencyMissing`] naming the first service that was not set.
    pub fn build(self) -> Result<Services> {
        Ok(Services {
            config: self.config.ok_or(Error::DependencyMissing("config"))?,
            locale: self.locale.ok_or(Error::DependencyMissing("locale"))?,
            downloader: self
                .downloader
                .ok_or(Error::DependencyMissing("downloader"))?,
            logger: self.logger.ok_or(Error::DependencyMissing("logger"))?,
            error_renderer: self
                .error_renderer
                .ok_or(Error::DependencyMissing("error_renderer"))?,
        })
    }
}

/// State and helpers shared by every controller
pub struct BaseController {
    config: Arc<Config>,
    locale: Arc<LocaleManager>,
    downloader: Arc<dyn Downloader>,
    logger: Span,
    error_renderer: Arc<dyn ErrorRenderer>,
    owner: &'static str,
    default_format: String,
}

impl BaseController {
    /// Set up the base of controller `Owner`
    ///
    /// The downloader is rebound to a span named after `Owner`. Unless
    /// streaming is enabled, the default format is restricted to formats
    /// served over HTTP(S).
    pub fn new<Owner: ?Sized + 'static>(services: &Services) -> Self {
        let owner = std::any::type_name::<Owner>();
        let logger = tracing::info_span!(parent: &services.logger, "controller", owner);
        let downloader = services.downloader.with_logger(logger.clone());

        let config = services.config.clone();
        let default_format = if config.stream {
            config.default_format.clone()
        } else {
            Config::add_http_to_format(&config.default_format)
        };

        tracing::debug!(
            owner,
            downloader = downloader.name(),
            default_format = %default_format,
            "Controller initialized"
        );

        Self {
            config,
            locale: services.locale.clone(),
            downloader,
            logger,
            error_renderer: services.error_renderer.clone(),
            owner,
            default_format,
        }
    }

    /// Name of the owning controller type, also its session segment name
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Application configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Locale manager
    pub fn locale_manager(&self) -> &LocaleManager {
        &self.locale
    }

    /// Downloader bound to this controller's span
    pub fn downloader(&self) -> &Arc<dyn Downloader> {
        &self.downloader
    }

    /// This controller's span
    pub fn logger(&self) -> &Span {
        &self.logger
    }

    /// Format used when the request does not ask for one
    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    /// Session segment owned by this controller
    pub fn segment(&self, session: &Session) -> Segment {
        Segment::new(session.clone(), self.owner)
    }

    /// Effective format of a request
    ///
    /// An explicit `format` query parameter always wins, even when empty.
    pub fn get_format(&self, params: &RequestParams) -> String {
        params
            .query("format")
            .map_or_else(|| self.default_format.clone(), str::to_owned)
    }

    /// Effective password of a request
    ///
    /// A `password` form field is remembered in `segment` under the
    /// requested URL and returned. Without one, the password remembered by
    /// the previous request (if any) is taken and returned.
    pub async fn get_password(
        &self,
        params: &RequestParams,
        segment: &Segment,
    ) -> Result<Option<String>> {
        let url = params.query("url").unwrap_or_default();

        match params.body("password") {
            Some(password) => {
                segment.put_flash(url, password).await?;
                Ok(Some(password.to_string()))
            }
            None => segment.take_flash(url).await,
        }
    }

    /// Look up the requested video with the effective format and password
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if `url` is missing or not an http(s) URL
    /// - [`Error::SessionUnavailable`] from the session segment
    /// - whatever the downloader reports
    pub async fn video(&self, session: &Session, params: &RequestParams) -> Result<Video> {
        let url = requested_url(params)?;
        let segment = self.segment(session);
        let format = self.get_format(params);
        let password = self.get_password(params, &segment).await?;

        let request = VideoRequest::new(url, format).with_password(password);
        self.downloader
            .video(&request)
            .instrument(self.logger.clone())
            .await
    }

    /// Show `message` to the user through the configured error renderer
    pub fn display_error(&self, params: &RequestParams, message: &str) -> Response {
        let _guard = self.logger.enter();
        tracing::debug!(message, "Rendering error page");
        self.error_renderer.render(params, message)
    }
}

fn requested_url(params: &RequestParams) -> Result<String> {
    let raw = params
        .query("url")
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::InvalidUrl("no URL given".to_string()))?;

    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        scheme => Err(Error::InvalidUrl(format!(
            "{raw}: unsupported scheme {scheme}"
        ))),
    }
}
