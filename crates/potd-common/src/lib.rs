//! # potd-common
//!
//! Shared utilities including configuration, error handling, service-account
//! authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    AssertionClaims, ServiceAccountKey, ServiceAccountSigner, DEFAULT_TOKEN_URI,
    SHEETS_READONLY_SCOPE,
};
pub use config::{
    AppConfig, AppSettings, BackfillConfig, ConfigError, DiscordConfig, Environment,
    LeaderboardConfig, PotdConfig, ScheduleConfig, SettingsSourceKind, SheetsConfig,
    StorageConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
