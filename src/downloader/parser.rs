//! Interpretation of the extractor's output

use super::Video;
use crate::error::{DownloaderError, Error};
use std::str;

/// Exit status of the external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command exited successfully (exit code 0)
    Success,
    /// The command failed with the given exit code (None if killed by a signal)
    Failure(Option<i32>),
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failure(status.code())
        }
    }
}

const PASSWORD_REQUIRED_MARKERS: &[&str] = &[
    "this video is protected by a password",
    "use the --video-password option",
];

const WRONG_PASSWORD_MARKERS: &[&str] = &["wrong password", "incorrect password"];

/// Turn the output of a `--dump-single-json` run into a [`Video`]
pub fn parse_video_output(
    url: &str,
    stdout: &[u8],
    stderr: &[u8],
    exit_status: ExitStatus,
) -> crate::Result<Video> {
    let error_output = String::from_utf8_lossy(stderr);
    let error_output = error_output.trim();

    if let ExitStatus::Failure(status) = exit_status {
        return Err(classify_failure(url, error_output, status));
    }

    let output = str::from_utf8(stdout)
        .map_err(|e| DownloaderError::InvalidOutput(format!("stdout is not UTF-8: {e}")))?;

    serde_json::from_str::<Video>(output.trim())
        .map_err(|e| DownloaderError::InvalidOutput(e.to_string()).into())
}

fn classify_failure(url: &str, stderr: &str, status: Option<i32>) -> Error {
    let lower = stderr.to_lowercase();

    if WRONG_PASSWORD_MARKERS.iter().any(|m| lower.contains(m)) {
        return Error::WrongPassword {
            url: url.to_string(),
        };
    }

    if PASSWORD_REQUIRED_MARKERS.iter().any(|m| lower.contains(m)) {
        return Error::PasswordRequired {
            url: url.to_string(),
        };
    }

    DownloaderError::ProcessFailed {
        status,
        stderr: stderr.to_string(),
    }
    .into()
}
