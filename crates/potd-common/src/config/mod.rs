//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BackfillConfig, ConfigError, DiscordConfig, Environment,
    LeaderboardConfig, PotdConfig, ScheduleConfig, SettingsSourceKind, SheetsConfig,
    StorageConfig,
};
