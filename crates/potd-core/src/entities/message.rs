//! Message and channel entities as seen through the chat platform

use super::reaction::ReactionCount;
use crate::value_objects::{Snowflake, TaskEmoji};

/// Minimal channel information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: Snowflake,
    pub name: Option<String>,
}

/// A message fetched from a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub reactions: Vec<ReactionCount>,
}

impl ChannelMessage {
    /// Create a message with no reactions
    pub fn new(id: Snowflake, channel_id: Snowflake) -> Self {
        Self {
            id,
            channel_id,
            reactions: Vec::new(),
        }
    }

    /// Allow-listed task emoji present on this message, in task order
    pub fn task_reactions(&self) -> Vec<TaskEmoji> {
        let mut emoji: Vec<TaskEmoji> = self
            .reactions
            .iter()
            .filter(|r| r.count > 0)
            .filter_map(ReactionCount::task_emoji)
            .collect();
        emoji.sort_unstable();
        emoji.dedup();
        emoji
    }
}
