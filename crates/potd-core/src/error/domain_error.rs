//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Missing setting: {0}")]
    MissingSetting(String),

    #[error("Invalid setting {key}: {value}")]
    InvalidSetting { key: String, value: String },

    // =========================================================================
    // Question Source Errors
    // =========================================================================
    #[error("Question source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed question source: {0}")]
    MalformedSource(String),

    // =========================================================================
    // Chat Platform Errors
    // =========================================================================
    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Chat platform rejected the bot token")]
    Unauthorized,

    #[error("Missing access to channel {0}")]
    MissingAccess(Snowflake),

    #[error("Chat platform error: {0}")]
    ChatError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    /// Get a short error code string for log fields
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Configuration
            Self::MissingSetting(_) => "MISSING_SETTING",
            Self::InvalidSetting { .. } => "INVALID_SETTING",

            // Source
            Self::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            Self::MalformedSource(_) => "MALFORMED_SOURCE",

            // Chat
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MissingAccess(_) => "MISSING_ACCESS",
            Self::ChatError(_) => "CHAT_ERROR",

            // Infrastructure
            Self::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_) | Self::MessageNotFound(_))
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingSetting(_) | Self::InvalidSetting { .. })
    }

    /// Check if this is a question source error
    pub fn is_source(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::MalformedSource(_))
    }

    /// Check if retrying later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::SourceUnavailable(_) | Self::ChatError(_)
        )
    }
}
