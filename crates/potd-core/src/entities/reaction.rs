//! Reaction entities - reaction summaries and reacting users

use crate::value_objects::{Snowflake, TaskEmoji};

/// Aggregated reaction count on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u32,
    pub me: bool,
}

impl ReactionCount {
    /// Create a new ReactionCount
    pub fn new(emoji: impl Into<String>, count: u32, me: bool) -> Self {
        Self {
            emoji: emoji.into(),
            count,
            me,
        }
    }

    /// Task emoji this reaction counts toward, if allow-listed
    #[inline]
    pub fn task_emoji(&self) -> Option<TaskEmoji> {
        TaskEmoji::parse(&self.emoji)
    }
}

/// A user who reacted to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionUser {
    pub id: Snowflake,
    pub bot: bool,
}

impl ReactionUser {
    /// Create a new ReactionUser
    pub fn new(id: Snowflake, bot: bool) -> Self {
        Self { id, bot }
    }
}
