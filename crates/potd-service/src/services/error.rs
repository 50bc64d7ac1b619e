//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use potd_common::AppError;
use potd_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Collaborator or domain failure
    Domain(DomainError),

    /// Routing settings could not be fetched or are incomplete; the process must stop
    Config(DomainError),

    /// Missing wiring or invalid input
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "Settings unavailable: {e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) | Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a settings failure from the error a settings source returned
    pub fn config(err: DomainError) -> Self {
        Self::Config(err)
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the process must halt instead of waiting for the next trigger
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::Validation(_) => true,
            Self::Domain(e) => e.is_configuration() || matches!(e, DomainError::Unauthorized),
            Self::Internal(_) => false,
        }
    }

    /// Get the error code for log fields
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Config(_) => "SETTINGS_UNAVAILABLE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::Config(e) => AppError::Config(e.to_string()),
            ServiceError::Validation(msg) => AppError::Config(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
