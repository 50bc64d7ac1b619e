//! Client errors and their mapping to domain errors

use std::time::Duration;

use potd_core::{DomainError, Snowflake};
use reqwest::StatusCode;
use thiserror::Error;

use crate::dto::ErrorBody;

/// Errors raised by the REST client before they reach the domain
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Rate limited, retry after {}ms", retry_after.as_millis())]
    RateLimited { retry_after: Duration, global: bool },

    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        /// Discord's JSON error code, when the body carried one
        code: Option<u32>,
        message: String,
    },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// What a request was about, used to pick the not-found variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Channel(Snowflake),
    Message {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
}

impl Target {
    fn channel_id(self) -> Snowflake {
        match self {
            Self::Channel(id) | Self::Message { channel_id: id, .. } => id,
        }
    }
}

impl ChatError {
    /// Convert into the port's error for a request about `target`
    pub fn into_domain(self, target: Target) -> DomainError {
        match self {
            Self::RateLimited { retry_after, .. } => DomainError::RateLimited {
                retry_after_ms: u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
            },
            Self::Status { status: 401, .. } => DomainError::Unauthorized,
            Self::Status { status: 403, .. } => DomainError::MissingAccess(target.channel_id()),
            Self::Status { status: 404, .. } => match target {
                Target::Channel(id) => DomainError::ChannelNotFound(id),
                Target::Message { message_id, .. } => DomainError::MessageNotFound(message_id),
            },
            other => DomainError::ChatError(other.to_string()),
        }
    }
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> ChatError {
    if error.is_timeout() {
        ChatError::Timeout(error.to_string())
    } else if error.is_decode() {
        ChatError::Decode(error.to_string())
    } else {
        ChatError::Transport(error.to_string())
    }
}

pub(crate) fn map_status_error(
    status: StatusCode,
    retry_after_header: Option<&str>,
    body: &[u8],
) -> ChatError {
    let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let seconds = parsed
            .as_ref()
            .and_then(|b| b.retry_after)
            .or_else(|| retry_after_header.and_then(|h| h.trim().parse::<f64>().ok()))
            .filter(|s| s.is_finite() && *s >= 0.0)
            .unwrap_or(1.0);
        return ChatError::RateLimited {
            retry_after: Duration::from_secs_f64(seconds),
            global: parsed.is_some_and(|b| b.global),
        };
    }

    let (code, message) = match parsed {
        Some(body) => (body.code, body.message.unwrap_or_default()),
        None => (None, body_preview(body)),
    };
    ChatError::Status {
        status: status.as_u16(),
        code,
        message,
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
