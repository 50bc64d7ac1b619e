//! # potd-api
//!
//! Discord REST client. Implements the `ChatClient` port over the v10 HTTP API with
//! bot token authentication.

pub mod client;
pub mod dto;
pub mod error;
pub mod routes;

pub use client::DiscordClient;
pub use error::{ChatError, Target};
pub use routes::Routes;
