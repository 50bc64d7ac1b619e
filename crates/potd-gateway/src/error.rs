//! Gateway errors

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::CloseCode;

/// Errors that end a gateway session
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Invalid frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Closed with a code that reconnecting cannot fix
    #[error("Gateway closed the session: {0}")]
    Fatal(CloseCode),
}

impl GatewayError {
    /// Whether the client should give up instead of reconnecting
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
