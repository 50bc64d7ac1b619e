//! Routing settings
//!
//! Both sources produce the same key/value pairs and share [`parse_settings`]:
//!
//! | key                   | value                        |
//! |-----------------------|------------------------------|
//! | `potd_channel`        | channel id (required)        |
//! | `test_channel`        | channel id (required)        |
//! | `leaderboard_channel` | channel id (required)        |
//! | `roles`               | comma separated role ids     |
//! | `debug`               | boolean, default `false`     |
//! | `leaderboard`         | boolean, default `true`      |

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use potd_core::{DomainError, PortResult, Settings, SettingsSource, Snowflake};
use tracing::{debug, instrument};

use crate::client::SheetsClient;

const POTD_CHANNEL: &str = "potd_channel";
const TEST_CHANNEL: &str = "test_channel";
const LEADERBOARD_CHANNEL: &str = "leaderboard_channel";
const ROLES: &str = "roles";
const DEBUG: &str = "debug";
const LEADERBOARD: &str = "leaderboard";

/// Environment variable behind each settings key
const ENV_KEYS: [(&str, &str); 6] = [
    ("POTD_CHANNEL_ID", POTD_CHANNEL),
    ("TEST_CHANNEL_ID", TEST_CHANNEL),
    ("LEADER_CHANNEL_ID", LEADERBOARD_CHANNEL),
    ("POTD_ROLE_IDS", ROLES),
    ("POTD_DEBUG", DEBUG),
    ("LEADERBOARD_ENABLED", LEADERBOARD),
];

/// Build [`Settings`] from key/value pairs
///
/// Keys are trimmed and case-insensitive; unknown keys are ignored and a later
/// duplicate wins.
pub fn parse_settings<I, K, V>(pairs: I) -> PortResult<Settings>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let values: HashMap<String, String> = pairs
        .into_iter()
        .map(|(k, v)| (k.as_ref().trim().to_ascii_lowercase(), v.as_ref().trim().to_string()))
        .collect();
    let get = |key: &str| lookup(&values, key);

    let channel = |key: &str| -> PortResult<Snowflake> {
        let raw = get(key).ok_or_else(|| DomainError::MissingSetting(key.to_string()))?;
        parse_id(key, raw)
    };

    let role_ids = match get(ROLES) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| parse_id(ROLES, id))
            .collect::<PortResult<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(Settings {
        potd_channel_id: channel(POTD_CHANNEL)?,
        test_channel_id: channel(TEST_CHANNEL)?,
        leaderboard_channel_id: channel(LEADERBOARD_CHANNEL)?,
        role_ids,
        debug: get(DEBUG).map_or(Ok(false), |raw| parse_flag(DEBUG, raw))?,
        leaderboard_enabled: get(LEADERBOARD).map_or(Ok(true), |raw| parse_flag(LEADERBOARD, raw))?,
    })
}

/// Non-blank value of `key`
fn lookup<'a>(values: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    values.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn invalid(key: &str, value: &str) -> DomainError {
    DomainError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_id(key: &str, raw: &str) -> PortResult<Snowflake> {
    match Snowflake::parse(raw) {
        Ok(id) if id.into_inner() > 0 => Ok(id),
        _ => Err(invalid(key, raw)),
    }
}

fn parse_flag(key: &str, raw: &str) -> PortResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(invalid(key, raw)),
    }
}

// ============================================================================
// Sheet
// ============================================================================

/// Settings kept as `key | value` rows in the spreadsheet
pub struct SheetSettingsSource {
    client: SheetsClient,
    range: String,
}

impl SheetSettingsSource {
    pub fn new(client: SheetsClient, range: impl Into<String>) -> Self {
        Self {
            client,
            range: range.into(),
        }
    }
}

#[async_trait]
impl SettingsSource for SheetSettingsSource {
    #[instrument(skip(self), fields(range = %self.range))]
    async fn fetch(&self) -> PortResult<Settings> {
        let rows = self.client.values(&self.range).await?;
        debug!(rows = rows.len(), "Fetched settings rows");

        parse_settings(rows.into_iter().filter_map(|row| {
            let mut cells = row.into_iter();
            let key = cells.next()?;
            Some((key, cells.next().unwrap_or_default()))
        }))
    }
}

// ============================================================================
// Environment
// ============================================================================

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Settings read from environment variables on every fetch
#[derive(Clone)]
pub struct EnvSettingsSource {
    lookup: Lookup,
}

impl EnvSettingsSource {
    /// Read the process environment
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Read variables through `lookup` instead of the process environment
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

impl Default for EnvSettingsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsSource for EnvSettingsSource {
    async fn fetch(&self) -> PortResult<Settings> {
        parse_settings(
            ENV_KEYS
                .iter()
                .filter_map(|&(var, key)| (self.lookup)(var).map(|value| (key, value))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{client, serve_once};

    fn base_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("potd_channel", "100"),
            ("test_channel", "200"),
            ("leaderboard_channel", "300"),
        ]
    }

    #[test]
    fn test_defaults() {
        let settings = parse_settings(base_pairs()).unwrap();

        assert_eq!(settings.potd_channel_id, Snowflake::new(100));
        assert_eq!(settings.test_channel_id, Snowflake::new(200));
        assert_eq!(settings.leaderboard_channel_id, Snowflake::new(300));
        assert!(settings.role_ids.is_empty());
        assert!(!settings.debug);
        assert!(settings.leaderboard_enabled);
    }

    #[test]
    fn test_keys_are_normalized() {
        let mut pairs = base_pairs();
        pairs.push(("  Roles ", " 11, 12 ,,"));
        pairs.push(("DEBUG", "Yes"));
        pairs.push(("leaderboard", "off"));
        pairs.push(("unrelated", "whatever"));

        let settings = parse_settings(pairs).unwrap();

        assert_eq!(settings.role_ids, vec![Snowflake::new(11), Snowflake::new(12)]);
        assert!(settings.debug);
        assert!(!settings.leaderboard_enabled);
    }

    #[test]
    fn test_missing_channel() {
        let pairs = vec![("potd_channel", "100"), ("test_channel", "   ")];
        let err = parse_settings(pairs).unwrap_err();
        assert!(matches!(err, DomainError::MissingSetting(ref k) if k == "test_channel"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = base_pairs();
        pairs.push(("debug", "maybe"));
        assert!(matches!(
            parse_settings(pairs).unwrap_err(),
            DomainError::InvalidSetting { ref key, .. } if key == "debug"
        ));

        let mut pairs = base_pairs();
        pairs[0] = ("potd_channel", "#general");
        assert!(matches!(
            parse_settings(pairs).unwrap_err(),
            DomainError::InvalidSetting { ref key, .. } if key == "potd_channel"
        ));
    }

    #[tokio::test]
    async fn test_env_source() {
        let source = EnvSettingsSource::with_lookup(|name| {
            let value = match name {
                "POTD_CHANNEL_ID" => "1",
                "TEST_CHANNEL_ID" => "2",
                "LEADER_CHANNEL_ID" => "3",
                "POTD_ROLE_IDS" => "4,5",
                "POTD_DEBUG" => "true",
                _ => return None,
            };
            Some(value.to_string())
        });

        let settings = source.fetch().await.unwrap();
        assert_eq!(settings.leaderboard_channel_id, Snowflake::new(3));
        assert_eq!(settings.role_ids.len(), 2);
        assert!(settings.debug);
        assert!(settings.leaderboard_enabled);
    }

    #[tokio::test]
    async fn test_env_source_missing_channel() {
        let source = EnvSettingsSource::with_lookup(|name| {
            (name == "POTD_CHANNEL_ID").then(|| "1".to_string())
        });
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            DomainError::MissingSetting(ref k) if k == "test_channel"
        ));
    }

    #[tokio::test]
    async fn test_sheet_source() {
        let (base, server) = serve_once(
            200,
            r#"{"values":[["key","value"],["potd_channel","100"],["test_channel","200"],["leaderboard_channel","300"],["roles","7"],["debug"]]}"#,
        )
        .await;

        let settings = SheetSettingsSource::new(client(&base), "Settings!A:B")
            .fetch()
            .await
            .unwrap();

        assert_eq!(settings.potd_channel_id, Snowflake::new(100));
        assert_eq!(settings.role_ids, vec![Snowflake::new(7)]);
        assert!(!settings.debug);
        server.await.unwrap();
    }
}
