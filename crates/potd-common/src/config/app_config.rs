//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use chrono::{FixedOffset, NaiveTime, Offset, Utc};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub discord: DiscordConfig,
    pub sheets: SheetsConfig,
    pub potd: PotdConfig,
    pub leaderboard: LeaderboardConfig,
    pub backfill: BackfillConfig,
    pub schedule: ScheduleConfig,
    pub storage: StorageConfig,
    pub settings_source: SettingsSourceKind,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Discord connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
    #[serde(default = "default_discord_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Google Sheets configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_question_range")]
    pub question_range: String,
    #[serde(default = "default_settings_range")]
    pub settings_range: String,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
}

/// Announcement configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PotdConfig {
    /// Questions per announcement (1-9, one keycap emoji each)
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

/// Leaderboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_leaderboard_limit")]
    pub limit: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

/// Reaction backfill configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackfillConfig {
    /// Pause between messages during a backfill scan
    #[serde(default = "default_backfill_delay_ms")]
    pub delay_ms: u64,
    /// Users requested per reaction page
    #[serde(default = "default_reaction_page_size")]
    pub reaction_page_size: u32,
    /// Maximum message ids collected by a channel history scan
    #[serde(default = "default_message_scan_limit")]
    pub message_scan_limit: usize,
}

/// Daily trigger configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_time")]
    pub time: NaiveTime,
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl ScheduleConfig {
    /// Fixed offset of the schedule's timezone
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        // Out-of-range offsets are rejected by `validate`
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

/// Persisted state locations
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_cursor_file")]
    pub cursor_file: String,
    #[serde(default = "default_message_registry_file")]
    pub message_registry_file: String,
}

/// Where routing settings are read from on every trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSourceKind {
    #[default]
    Sheet,
    Env,
}

// Default value functions
fn default_app_name() -> String {
    "potd-bot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_discord_gateway_url() -> String {
    "wss://gateway.discord.gg/?v=10&encoding=json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_question_range() -> String {
    "ACPOTD!A2:B".to_string()
}

fn default_settings_range() -> String {
    "Settings!A:B".to_string()
}

fn default_credentials_file() -> String {
    "credentials.json".to_string()
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_batch_size() -> u32 {
    2
}

fn default_leaderboard_limit() -> usize {
    50
}

fn default_chunk_size() -> usize {
    20
}

fn default_backfill_delay_ms() -> u64 {
    1000
}

fn default_reaction_page_size() -> u32 {
    100
}

fn default_message_scan_limit() -> usize {
    200
}

fn default_schedule_time() -> NaiveTime {
    NaiveTime::MIN
}

fn default_utc_offset_minutes() -> i32 {
    330 // Asia/Kolkata
}

fn default_cursor_file() -> String {
    "lastFetchedIndex.json".to_string()
}

fn default_message_registry_file() -> String {
    "potdMessageIds.json".to_string()
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_var<T: FromStr>(name: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default()),
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            discord: DiscordConfig {
                token: required_var("DISCORD_TOKEN")?,
                api_base: env::var("DISCORD_API_BASE")
                    .unwrap_or_else(|_| default_discord_api_base()),
                gateway_url: env::var("DISCORD_GATEWAY_URL")
                    .unwrap_or_else(|_| default_discord_gateway_url()),
                request_timeout_secs: parse_var(
                    "DISCORD_REQUEST_TIMEOUT_SECS",
                    default_request_timeout_secs,
                )?,
            },
            sheets: SheetsConfig {
                spreadsheet_id: required_var("SPREADSHEET_ID")?,
                question_range: env::var("SHEET_QUESTION_RANGE")
                    .unwrap_or_else(|_| default_question_range()),
                settings_range: env::var("SHEET_SETTINGS_RANGE")
                    .unwrap_or_else(|_| default_settings_range()),
                credentials_file: env::var("GOOGLE_CREDENTIALS_FILE")
                    .unwrap_or_else(|_| default_credentials_file()),
                api_base: env::var("SHEETS_API_BASE").unwrap_or_else(|_| default_sheets_api_base()),
            },
            potd: PotdConfig {
                batch_size: parse_var("POTD_BATCH_SIZE", default_batch_size)?,
            },
            leaderboard: LeaderboardConfig {
                limit: parse_var("LEADERBOARD_LIMIT", default_leaderboard_limit)?,
                chunk_size: parse_var("LEADERBOARD_CHUNK_SIZE", default_chunk_size)?,
            },
            backfill: BackfillConfig {
                delay_ms: parse_var("BACKFILL_DELAY_MS", default_backfill_delay_ms)?,
                reaction_page_size: parse_var("REACTION_PAGE_SIZE", default_reaction_page_size)?,
                message_scan_limit: parse_var("MESSAGE_SCAN_LIMIT", default_message_scan_limit)?,
            },
            schedule: ScheduleConfig {
                time: match env::var("SCHEDULE_TIME") {
                    Ok(raw) => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                        .map_err(|_| ConfigError::InvalidValue("SCHEDULE_TIME", raw))?,
                    Err(_) => default_schedule_time(),
                },
                utc_offset_minutes: parse_var(
                    "SCHEDULE_UTC_OFFSET_MINUTES",
                    default_utc_offset_minutes,
                )?,
            },
            storage: StorageConfig {
                cursor_file: env::var("CURSOR_FILE").unwrap_or_else(|_| default_cursor_file()),
                message_registry_file: env::var("MESSAGE_REGISTRY_FILE")
                    .unwrap_or_else(|_| default_message_registry_file()),
            },
            settings_source: match env::var("SETTINGS_SOURCE") {
                Ok(raw) => match raw.trim().to_lowercase().as_str() {
                    "sheet" => SettingsSourceKind::Sheet,
                    "env" => SettingsSourceKind::Env,
                    _ => return Err(ConfigError::InvalidValue("SETTINGS_SOURCE", raw)),
                },
                Err(_) => SettingsSourceKind::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for the first out-of-range value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=9).contains(&self.potd.batch_size) {
            return Err(ConfigError::InvalidValue(
                "POTD_BATCH_SIZE",
                self.potd.batch_size.to_string(),
            ));
        }
        if self.leaderboard.limit == 0 {
            return Err(ConfigError::InvalidValue("LEADERBOARD_LIMIT", "0".to_string()));
        }
        if self.leaderboard.chunk_size == 0 {
            return Err(ConfigError::InvalidValue("LEADERBOARD_CHUNK_SIZE", "0".to_string()));
        }
        if !(1..=100).contains(&self.backfill.reaction_page_size) {
            return Err(ConfigError::InvalidValue(
                "REACTION_PAGE_SIZE",
                self.backfill.reaction_page_size.to_string(),
            ));
        }
        if FixedOffset::east_opt(self.schedule.utc_offset_minutes * 60).is_none() {
            return Err(ConfigError::InvalidValue(
                "SCHEDULE_UTC_OFFSET_MINUTES",
                self.schedule.utc_offset_minutes.to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            discord: DiscordConfig {
                token: "token".to_string(),
                api_base: default_discord_api_base(),
                gateway_url: default_discord_gateway_url(),
                request_timeout_secs: default_request_timeout_secs(),
            },
            sheets: SheetsConfig {
                spreadsheet_id: "sheet".to_string(),
                question_range: default_question_range(),
                settings_range: default_settings_range(),
                credentials_file: default_credentials_file(),
                api_base: default_sheets_api_base(),
            },
            potd: PotdConfig {
                batch_size: default_batch_size(),
            },
            leaderboard: LeaderboardConfig {
                limit: default_leaderboard_limit(),
                chunk_size: default_chunk_size(),
            },
            backfill: BackfillConfig {
                delay_ms: default_backfill_delay_ms(),
                reaction_page_size: default_reaction_page_size(),
                message_scan_limit: default_message_scan_limit(),
            },
            schedule: ScheduleConfig {
                time: default_schedule_time(),
                utc_offset_minutes: default_utc_offset_minutes(),
            },
            storage: StorageConfig {
                cursor_file: default_cursor_file(),
                message_registry_file: default_message_registry_file(),
            },
            settings_source: SettingsSourceKind::Sheet,
        }
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "potd-bot");
        assert_eq!(default_batch_size(), 2);
        assert_eq!(default_leaderboard_limit(), 50);
        assert_eq!(default_cursor_file(), "lastFetchedIndex.json");
        assert_eq!(default_message_registry_file(), "potdMessageIds.json");
        assert_eq!(default_schedule_time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_schedule_offset() {
        let schedule = ScheduleConfig {
            time: default_schedule_time(),
            utc_offset_minutes: 330,
        };
        assert_eq!(schedule.offset().local_minus_utc(), 330 * 60);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_batch_size() {
        let mut config = sample_config();
        config.potd.batch_size = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("POTD_BATCH_SIZE", _))
        ));

        config.potd.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_chunk() {
        let mut config = sample_config();
        config.leaderboard.chunk_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("LEADERBOARD_CHUNK_SIZE", _))
        ));
    }

    #[test]
    fn test_validate_rejects_offset() {
        let mut config = sample_config();
        config.schedule.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }
}
