//! Error types for video-dl-web
//!
//! This module provides the error handling used by controllers and the HTTP layer:
//! - Domain-specific error types (session, services, downloader, configuration)
//! - HTTP status code mapping for responses
//! - Structured error bodies with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for video-dl-web operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for video-dl-web
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "default_format")
        key: Option<String>,
    },

    /// A required service was not provided when building controllers
    #[error("missing required service: {0}")]
    DependencyMissing(&'static str),

    /// The session store or the session state could not be used
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    /// The request could not be read (malformed body, bad encoding)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The `url` parameter is missing or not an absolute http(s) URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The video is protected and no password was supplied
    #[error("video {url} is protected by a password")]
    PasswordRequired {
        /// The requested video page URL
        url: String,
    },

    /// The supplied password was rejected
    #[error("wrong password for video {url}")]
    WrongPassword {
        /// The requested video page URL
        url: String,
    },

    /// Downloader backend error
    #[error("downloader error: {0}")]
    Downloader(#[from] DownloaderError),

    /// Requested locale is not in the supported list
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Operation not supported (missing binary, no-op backend, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors raised by a downloader backend
#[derive(Debug, Error)]
pub enum DownloaderError {
    /// The external binary could not be started
    #[error("failed to execute {binary}: {reason}")]
    ExecutionFailed {
        /// Binary that was invoked
        binary: PathBuf,
        /// Underlying OS error
        reason: String,
    },

    /// The external binary exited with a failure status
    #[error("downloader exited with status {status:?}: {stderr}")]
    ProcessFailed {
        /// Exit code, if the process was not killed by a signal
        status: Option<i32>,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The binary produced output that could not be parsed
    #[error("unexpected downloader output: {0}")]
    InvalidOutput(String),

    /// No direct media URL matched the requested format
    #[error("no media URL found for {url}")]
    NoMediaUrl {
        /// The requested video page URL
        url: String,
    },
}

/// Error response body
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "password_required",
///     "message": "video https://example.com/v/1 is protected by a password",
///     "details": {
///       "url": "https://example.com/v/1"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "session_unavailable")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Config { .. } => 400,
            Error::InvalidRequest(_) => 400,
            Error::InvalidUrl(_) => 400,
            Error::UnsupportedLocale(_) => 400,

            // 403 Forbidden - credentials needed or rejected
            Error::PasswordRequired { .. } => 403,
            Error::WrongPassword { .. } => 403,

            // 500 Internal Server Error
            Error::DependencyMissing(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,

            // 501 Not Implemented
            Error::NotSupported(_) => 501,

            // 502 Bad Gateway - the downloader misbehaved
            Error::Downloader(DownloaderError::ProcessFailed { .. }) => 502,
            Error::Downloader(DownloaderError::InvalidOutput(_)) => 502,
            Error::Downloader(DownloaderError::NoMediaUrl { .. }) => 502,

            // 503 Service Unavailable
            Error::Downloader(DownloaderError::ExecutionFailed { .. }) => 503,
            Error::SessionUnavailable(_) => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::DependencyMissing(_) => "dependency_missing",
            Error::SessionUnavailable(_) => "session_unavailable",
            Error::InvalidRequest(_) => "invalid_request",
            Error::InvalidUrl(_) => "invalid_url",
            Error::PasswordRequired { .. } => "password_required",
            Error::WrongPassword { .. } => "wrong_password",
            Error::Downloader(e) => match e {
                DownloaderError::ExecutionFailed { .. } => "external_tool_error",
                DownloaderError::ProcessFailed { .. } => "process_failed",
                DownloaderError::InvalidOutput(_) => "invalid_output",
                DownloaderError::NoMediaUrl { .. } => "no_media_url",
            },
            Error::UnsupportedLocale(_) => "unsupported_locale",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::NotSupported(_) => "not_supported",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(error: tower_sessions::session::Error) -> Self {
        Error::SessionUnavailable(error.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::DependencyMissing(service) => Some(serde_json::json!({
                "service": service,
            })),
            Error::PasswordRequired { url } | Error::WrongPassword { url } => {
                Some(serde_json::json!({
                    "url": url,
                }))
            }
            Error::Downloader(DownloaderError::ProcessFailed { status, .. }) => {
                Some(serde_json::json!({
                    "exit_code": status,
                }))
            }
            Error::Downloader(DownloaderError::NoMediaUrl { url }) => Some(serde_json::json!({
                "url": url,
            })),
            Error::UnsupportedLocale(locale) => Some(serde_json::json!({
                "locale": locale,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
