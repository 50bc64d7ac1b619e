//! # potd-bot
//!
//! Wires the adapters into a service context and runs the bot: the daily
//! announcement schedule, the gateway listener, and the operator commands.

pub mod commands;
pub mod schedule;
pub mod server;

pub use commands::Command;
pub use server::{create_context, run};
