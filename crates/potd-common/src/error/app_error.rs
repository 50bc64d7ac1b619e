//! Application error types
//!
//! Unified error handling for the bot process.

use potd_core::DomainError;
use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Env(#[from] ConfigError),

    // Question/settings spreadsheet errors
    #[error("Spreadsheet error: {0}")]
    Source(String),

    // Chat platform errors
    #[error("Chat platform error: {0}")]
    Chat(String),

    // Gateway connection errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    // Persisted state errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Get error code for log fields
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Env(_) => "CONFIG_ERROR",
            Self::Source(_) => "SOURCE_ERROR",
            Self::Chat(_) => "CHAT_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Whether the process must stop rather than keep serving
    ///
    /// Configuration problems and a rejected bot token can never fix themselves.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Env(_) => true,
            Self::Domain(e) => e.is_configuration() || matches!(e, DomainError::Unauthorized),
            _ => false,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(msg: impl fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
