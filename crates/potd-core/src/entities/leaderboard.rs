//! Leaderboard entity - one ranked line

use crate::value_objects::Snowflake;

/// A user's position on the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry {
    pub user_id: Snowflake,
    pub count: u32,
    pub rank: usize,
}

impl RankedEntry {
    /// Create a new RankedEntry
    pub fn new(user_id: Snowflake, count: u32, rank: usize) -> Self {
        Self {
            user_id,
            count,
            rank,
        }
    }
}
