//! Reaction backfill
//!
//! Rebuilds the ledger from scratch by scanning every registered announcement,
//! every task emoji on it, and every page of reacting users. One message at a
//! time, with a fixed pause between messages.

use futures::StreamExt;
use potd_core::Snowflake;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::ledger::ReactionLedger;
use super::pagination::reaction_user_pages;

/// Counters from one backfill run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillStats {
    pub messages_scanned: usize,
    pub messages_skipped: usize,
    pub pages_failed: usize,
    pub reactions_counted: u64,
    pub users: usize,
}

/// Backfill service
pub struct BackfillService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BackfillService<'a> {
    /// Create a new BackfillService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Scan `message_ids` in `channel_id` into a fresh ledger
    ///
    /// A message that cannot be fetched is skipped; a failing page ends that emoji
    /// for that message only.
    #[instrument(skip(self, message_ids), fields(messages = message_ids.len()))]
    pub async fn build(
        &self,
        channel_id: Snowflake,
        message_ids: &[Snowflake],
    ) -> (ReactionLedger, BackfillStats) {
        let mut ledger = ReactionLedger::new();
        let mut stats = BackfillStats::default();
        let delay = self.ctx.options().backfill_delay;
        let bot_user = self.ctx.live_state().bot_user();

        for (i, &message_id) in message_ids.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let message = match self.ctx.chat().fetch_message(channel_id, message_id).await {
                Ok(message) => message,
                Err(e) => {
                    warn!(%message_id, error = %e, "Skipping message");
                    stats.messages_skipped += 1;
                    continue;
                }
            };

            for emoji in message.task_reactions() {
                let mut pages = Box::pin(reaction_user_pages(
                    self.ctx.chat(),
                    channel_id,
                    message_id,
                    emoji,
                    self.ctx.options().reaction_page_size,
                ));

                while let Some(page) = pages.next().await {
                    match page {
                        Ok(users) => {
                            for user in users {
                                if user.bot || Some(user.id) == bot_user {
                                    continue;
                                }
                                ledger.increment(user.id);
                                stats.reactions_counted += 1;
                            }
                        }
                        Err(e) => {
                            warn!(%message_id, %emoji, error = %e, "Skipping rest of reaction pages");
                            stats.pages_failed += 1;
                            break;
                        }
                    }
                }
            }
            stats.messages_scanned += 1;
        }

        stats.users = ledger.len();
        (ledger, stats)
    }

    /// Rebuild from the registry and swap the result into the shared ledger
    ///
    /// The shared ledger keeps serving reads during the scan. Live changes applied
    /// while the scan runs are replaced by the scan's result.
    #[instrument(skip(self))]
    pub async fn rebuild(&self, channel_id: Snowflake) -> BackfillStats {
        let message_ids = self.ctx.registry_store().load_all().await;
        let (ledger, stats) = self.build(channel_id, &message_ids).await;

        *self.ctx.ledger().lock() = ledger;

        info!(
            scanned = stats.messages_scanned,
            skipped = stats.messages_skipped,
            pages_failed = stats.pages_failed,
            reactions = stats.reactions_counted,
            users = stats.users,
            "Backfill complete"
        );
        stats
    }
}
