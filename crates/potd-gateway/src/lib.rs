//! # potd-gateway
//!
//! Discord gateway (v10) client. Keeps one WebSocket session alive and feeds
//! reaction add/remove dispatches into the live reaction ledger.

pub mod connection;
pub mod error;
pub mod events;
pub mod protocol;

pub use connection::{GatewayClient, GatewayOptions};
pub use error::{GatewayError, GatewayResult};
pub use protocol::Intents;
