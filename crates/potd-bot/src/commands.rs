//! Operator commands read line by line from stdin

use std::str::FromStr;

use potd_common::AppError;
use potd_service::{LeaderboardReport, PotdService, ServiceContext, ServiceError, ServiceResult};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{error, info, warn};

use crate::schedule::log_report;

/// A manual trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RunPotd,
    Leaderboard,
    Backfill,
    MakeMessageFile,
    ExportRegistry,
}

#[derive(Debug, Error)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "run-potd" | "potd" => Ok(Self::RunPotd),
            "leaderboard" => Ok(Self::Leaderboard),
            "backfill" => Ok(Self::Backfill),
            "make-msgfile" => Ok(Self::MakeMessageFile),
            "export-registry" => Ok(Self::ExportRegistry),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl Command {
    /// Run the command, logging what it did
    pub async fn execute(self, ctx: &ServiceContext) -> ServiceResult<()> {
        let potd = PotdService::new(ctx);
        match self {
            Self::RunPotd => log_report(&potd.run_potd().await?),
            Self::Leaderboard => match potd.run_leaderboard().await? {
                LeaderboardReport::Disabled => info!("Leaderboard disabled in settings"),
                LeaderboardReport::Published {
                    messages_sent,
                    entries,
                    total_submissions,
                } => info!(messages_sent, entries, total_submissions, "Leaderboard published"),
                LeaderboardReport::Interrupted { messages_sent } => {
                    warn!(messages_sent, "Leaderboard delivery interrupted");
                }
            },
            Self::Backfill => {
                let stats = potd.rebuild_backfill().await?;
                info!(
                    messages = stats.messages_scanned,
                    skipped = stats.messages_skipped,
                    pages_failed = stats.pages_failed,
                    users = stats.users,
                    reactions = stats.reactions_counted,
                    "Backfill complete"
                );
            }
            Self::MakeMessageFile => {
                let ids = potd.make_message_file().await?;
                info!(count = ids.len(), "Message registry rebuilt");
            }
            Self::ExportRegistry => {
                let ids = potd.export_message_registry_snapshot().await;
                let json =
                    serde_json::to_string(&ids).map_err(|e| ServiceError::internal(e.to_string()))?;
                info!(count = ids.len(), registry = %json, "Message registry snapshot");
            }
        }
        Ok(())
    }
}

/// Execute commands from `input` until it closes
///
/// Bad lines and failed commands are logged; a fatal failure ends the loop with
/// an error. A closed input leaves the rest of the bot running.
pub async fn listen<R>(ctx: &ServiceContext, input: R) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    while let Some(line) = lines.next_line().await.map_err(AppError::internal)? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Ignoring input");
                continue;
            }
        };

        info!(?command, "Running command");
        match command.execute(ctx).await {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => error!(error = %e, code = e.error_code(), ?command, "Command failed"),
        }
    }

    info!("Command input closed");
    std::future::pending().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use potd_core::{Cursor, Snowflake, TaskEmoji};
    use potd_service::services::testing::{
        default_settings, rows, TestHarness, LEADERBOARD_CHANNEL, POTD_CHANNEL,
    };
    use std::time::Duration;

    #[test]
    fn test_parse() {
        assert_eq!("run-potd".parse::<Command>().unwrap(), Command::RunPotd);
        assert_eq!(" /Leaderboard \n".parse::<Command>().unwrap(), Command::Leaderboard);
        assert_eq!("make-msgfile".parse::<Command>().unwrap(), Command::MakeMessageFile);
        assert_eq!("export-registry".parse::<Command>().unwrap(), Command::ExportRegistry);
        assert!("reboot".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_listen_runs_commands_in_order() {
        let h = TestHarness::with_rows(rows(&["Task A", "Task B"]));
        h.chat.add_reactors(
            POTD_CHANNEL,
            Snowflake::new(50),
            TaskEmoji::for_task(1).unwrap(),
            &[7],
            &[],
        );
        h.registry.set_ids(vec![Snowflake::new(50)]);

        let input: &[u8] = b"backfill\nnonsense\n\nrun-potd\nleaderboard\n";
        let result = tokio::time::timeout(Duration::from_millis(500), listen(&h.ctx, input)).await;

        // input exhausted, the listener stays parked
        assert!(result.is_err());
        assert_eq!(h.cursor.current(), Some(Cursor::new(3, 2)));

        let sent = h.chat.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].channel_id, POTD_CHANNEL);
        assert_eq!(sent[1].channel_id, LEADERBOARD_CHANNEL);
        assert!(sent[1].content.contains("<@7>"));
    }

    #[tokio::test]
    async fn test_fatal_command_error_stops_listener() {
        let h = TestHarness::new();
        h.settings.break_source();

        let input: &[u8] = b"leaderboard\nrun-potd\n";
        let err = listen(&h.ctx, input).await.unwrap_err();

        assert!(err.is_fatal());
        assert!(h.chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_export_registry() {
        let h = TestHarness::new();
        h.registry.set_ids(vec![Snowflake::new(5), Snowflake::new(6)]);
        assert!(Command::ExportRegistry.execute(&h.ctx).await.is_ok());

        let mut settings = default_settings();
        settings.leaderboard_enabled = false;
        h.settings.set(settings);
        assert!(Command::Leaderboard.execute(&h.ctx).await.is_ok());
        assert!(h.chat.sent().is_empty());
    }
}
