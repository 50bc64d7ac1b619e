//! Bot use cases
//!
//! The operations the scheduler and the command surface invoke. Settings are fetched
//! at the start of every operation; failing to get them is fatal.

use chrono::{NaiveDate, Utc};
use potd_core::{QuestionBatch, Settings, Snowflake};
use tracing::{error, info, instrument, warn};

use super::announcement::{format_announcement, task_emoji, HOLIDAY_MESSAGE};
use super::backfill::{BackfillService, BackfillStats};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::leaderboard::{LeaderboardReport, LeaderboardService};
use super::registry::MessageRegistry;
use super::sequencer::{Outcome, SequencerService};

/// What one POTD trigger did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PotdReport {
    /// Holiday text sent, or attempted when `message_id` is `None`
    Holiday { message_id: Option<Snowflake> },
    /// Questions announced, or attempted when `message_id` is `None`
    Posted {
        sequence: u32,
        message_id: Option<Snowflake>,
        registered: bool,
    },
    /// Nothing to announce; cursor untouched
    Nothing,
}

/// POTD service
pub struct PotdService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PotdService<'a> {
    /// Create a new PotdService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch routing settings and point the live filter at the announcement channel
    pub async fn load_settings(&self) -> ServiceResult<Settings> {
        let settings = self
            .ctx
            .settings_source()
            .fetch()
            .await
            .map_err(ServiceError::config)?;

        self.ctx.live_state().watch_channel(settings.potd_channel_id);
        Ok(settings)
    }

    /// Decide, advance, announce, and register, dated in the schedule offset
    pub async fn run_potd(&self) -> ServiceResult<PotdReport> {
        let today = Utc::now()
            .with_timezone(&self.ctx.options().utc_offset)
            .date_naive();
        self.run_potd_on(today).await
    }

    /// [`run_potd`](Self::run_potd) with an explicit announcement date
    ///
    /// Only one trigger runs at a time. The cursor is saved before anything is sent.
    #[instrument(skip(self))]
    pub async fn run_potd_on(&self, date: NaiveDate) -> ServiceResult<PotdReport> {
        let _guard = self.ctx.potd_guard().lock().await;

        let settings = self.load_settings().await?;
        let cursor = self.ctx.cursor_store().load().await;
        let decision = SequencerService::new(self.ctx).decide(cursor).await;

        if decision.advanced(cursor) {
            self.ctx.cursor_store().save(&decision.cursor).await?;
            info!(from = %cursor, to = %decision.cursor, "Cursor advanced");
        }

        let report = match decision.outcome {
            Outcome::Holiday => {
                let message_id = self.send(settings.announcement_channel(), HOLIDAY_MESSAGE).await;
                info!(next_index = decision.cursor.next_index, "Holiday, no questions today");
                PotdReport::Holiday { message_id }
            }
            Outcome::Batch(batch) => self.announce(&settings, &batch, date).await?,
            Outcome::Empty => {
                info!(next_index = cursor.next_index, "No questions to post");
                PotdReport::Nothing
            }
        };
        Ok(report)
    }

    async fn announce(
        &self,
        settings: &Settings,
        batch: &QuestionBatch,
        date: NaiveDate,
    ) -> ServiceResult<PotdReport> {
        let channel_id = settings.announcement_channel();
        let sequence = batch.sequence;

        if let Err(e) = self.ctx.chat().fetch_channel(channel_id).await {
            error!(%channel_id, sequence, error = %e, "Announcement channel unavailable");
            return Ok(PotdReport::Posted {
                sequence,
                message_id: None,
                registered: false,
            });
        }

        let text = format_announcement(batch, date, &settings.role_ids);
        let Some(message_id) = self.send(channel_id, &text).await else {
            return Ok(PotdReport::Posted {
                sequence,
                message_id: None,
                registered: false,
            });
        };

        for emoji in task_emoji(batch) {
            if let Err(e) = self
                .ctx
                .chat()
                .react_to_message(channel_id, message_id, emoji)
                .await
            {
                warn!(%message_id, %emoji, error = %e, "Failed to add reaction");
            }
        }

        let registered = if settings.debug {
            info!(%message_id, "Debug routing, message not registered");
            false
        } else {
            MessageRegistry::new(self.ctx).append(message_id).await?;
            true
        };

        info!(sequence, %message_id, %channel_id, "POTD posted");
        Ok(PotdReport::Posted {
            sequence,
            message_id: Some(message_id),
            registered,
        })
    }

    async fn send(&self, channel_id: Snowflake, text: &str) -> Option<Snowflake> {
        match self.ctx.chat().send_message(channel_id, text).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(%channel_id, error = %e, code = e.code(), "Failed to send message");
                None
            }
        }
    }

    /// Rank and publish the leaderboard
    #[instrument(skip(self))]
    pub async fn run_leaderboard(&self) -> ServiceResult<LeaderboardReport> {
        let settings = self.load_settings().await?;
        Ok(LeaderboardService::new(self.ctx).publish(&settings).await)
    }

    /// Rebuild the ledger from every registered announcement
    #[instrument(skip(self))]
    pub async fn rebuild_backfill(&self) -> ServiceResult<BackfillStats> {
        let settings = self.load_settings().await?;
        Ok(BackfillService::new(self.ctx)
            .rebuild(settings.potd_channel_id)
            .await)
    }

    /// Registered message ids in send order
    pub async fn export_message_registry_snapshot(&self) -> Vec<Snowflake> {
        MessageRegistry::new(self.ctx).load_all().await
    }

    /// Replace the registry with the announcement channel's recent history
    #[instrument(skip(self))]
    pub async fn make_message_file(&self) -> ServiceResult<Vec<Snowflake>> {
        let settings = self.load_settings().await?;
        let registry = MessageRegistry::new(self.ctx);

        let ids = registry.scan_channel(settings.potd_channel_id).await?;
        registry.replace(&ids).await?;

        info!(count = ids.len(), "Message registry rewritten from channel history");
        Ok(ids)
    }
}
