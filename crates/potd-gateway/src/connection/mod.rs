//! Gateway connection management

mod client;
mod session;

pub use client::{GatewayClient, GatewayOptions};
pub use session::{Action, Dispatch, SessionState};
