//! Live reaction events - reaction add/remove notifications from the chat platform

use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, TaskEmoji};

/// Whether a reaction was added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionEventKind {
    Added,
    Removed,
}

/// A reaction change observed while the process is running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveReactionEvent {
    pub kind: ReactionEventKind,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub emoji: String,
    /// Only known for added reactions; removals never carry member data
    #[serde(default)]
    pub user_is_bot: bool,
}

impl LiveReactionEvent {
    /// Create a reaction-added event
    pub fn added(
        channel_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: impl Into<String>,
        user_is_bot: bool,
    ) -> Self {
        Self {
            kind: ReactionEventKind::Added,
            channel_id,
            message_id,
            user_id,
            emoji: emoji.into(),
            user_is_bot,
        }
    }

    /// Create a reaction-removed event
    pub fn removed(
        channel_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            kind: ReactionEventKind::Removed,
            channel_id,
            message_id,
            user_id,
            emoji: emoji.into(),
            user_is_bot: false,
        }
    }

    /// Task emoji this event refers to, if allow-listed
    #[inline]
    pub fn task_emoji(&self) -> Option<TaskEmoji> {
        TaskEmoji::parse(&self.emoji)
    }
}
