//! Live reaction reconciliation
//!
//! Applies reaction add/remove events observed while running to the shared ledger.

use parking_lot::RwLock;
use potd_core::{LiveReactionEvent, ReactionEventKind, Snowflake};
use tracing::{debug, trace};

use super::context::ServiceContext;

/// Filter state for live events
///
/// The watched channel follows the most recently fetched settings; the bot id is
/// learned from the gateway handshake.
#[derive(Debug, Default)]
pub struct LiveState {
    watched_channel: RwLock<Option<Snowflake>>,
    bot_user_id: RwLock<Option<Snowflake>>,
}

impl LiveState {
    pub fn watch_channel(&self, channel_id: Snowflake) {
        *self.watched_channel.write() = Some(channel_id);
    }

    pub fn watched_channel(&self) -> Option<Snowflake> {
        *self.watched_channel.read()
    }

    pub fn set_bot_user(&self, user_id: Snowflake) {
        *self.bot_user_id.write() = Some(user_id);
    }

    pub fn bot_user(&self) -> Option<Snowflake> {
        *self.bot_user_id.read()
    }
}

/// Why an event left the ledger alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Bot,
    OtherChannel,
    NotTaskEmoji,
}

/// Result of handling one live event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOutcome {
    /// The user's count after the change
    Applied { count: u32 },
    Ignored(IgnoreReason),
}

/// Live reaction service
pub struct LiveReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LiveReactionService<'a> {
    /// Create a new LiveReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply one event
    pub fn handle(&self, event: &LiveReactionEvent) -> LiveOutcome {
        let outcome = self.apply(event);
        match outcome {
            LiveOutcome::Applied { count } => debug!(
                kind = ?event.kind,
                user_id = %event.user_id,
                message_id = %event.message_id,
                emoji = %event.emoji,
                count,
                "Live reaction applied"
            ),
            LiveOutcome::Ignored(reason) => trace!(?reason, emoji = %event.emoji, "Live reaction ignored"),
        }
        outcome
    }

    fn apply(&self, event: &LiveReactionEvent) -> LiveOutcome {
        let state = self.ctx.live_state();

        if event.user_is_bot || state.bot_user() == Some(event.user_id) {
            return LiveOutcome::Ignored(IgnoreReason::Bot);
        }
        if state.watched_channel() != Some(event.channel_id) {
            return LiveOutcome::Ignored(IgnoreReason::OtherChannel);
        }
        if event.task_emoji().is_none() {
            return LiveOutcome::Ignored(IgnoreReason::NotTaskEmoji);
        }

        let mut ledger = self.ctx.ledger().lock();
        let count = match event.kind {
            ReactionEventKind::Added => ledger.increment(event.user_id),
            ReactionEventKind::Removed => ledger.decrement(event.user_id),
        };
        LiveOutcome::Applied { count }
    }
}
