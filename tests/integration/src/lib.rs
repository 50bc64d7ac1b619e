//! Integration test utilities for the POTD bot
//!
//! This crate provides a file-backed bot harness and shared fixtures for
//! end-to-end scenarios across the services and the JSON stores.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
