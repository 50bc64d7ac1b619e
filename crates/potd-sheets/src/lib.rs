//! # potd-sheets
//!
//! Google Sheets v4 adapters: the question rows and the routing settings, read with
//! a service-account access token.

pub mod auth;
pub mod client;
pub mod error;
pub mod questions;
pub mod settings;

pub use auth::{AccessTokenProvider, ServiceAccountTokenProvider, StaticToken};
pub use client::SheetsClient;
pub use error::SheetsError;
pub use questions::SheetQuestionSource;
pub use settings::{parse_settings, EnvSettingsSource, SheetSettingsSource};
