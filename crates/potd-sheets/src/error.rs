//! Sheets adapter errors

use potd_core::DomainError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl SheetsError {
    pub(crate) fn status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
            .unwrap_or_else(|| String::from_utf8_lossy(body).chars().take(160).collect());
        Self::Status {
            status: status.as_u16(),
            message,
        }
    }
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> SheetsError {
    if error.is_timeout() {
        SheetsError::Timeout(error.to_string())
    } else {
        SheetsError::Transport(error.to_string())
    }
}

impl From<SheetsError> for DomainError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Decode(msg) => DomainError::MalformedSource(msg),
            other => DomainError::SourceUnavailable(other.to_string()),
        }
    }
}
