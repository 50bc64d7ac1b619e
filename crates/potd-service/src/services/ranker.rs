//! Leaderboard ranking
//!
//! Competition ranking ("1224" style): tied counts share a rank and the next
//! distinct count takes its 1-based position.

use potd_core::{RankedEntry, Snowflake};

/// A ranked, truncated view of a ledger snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<RankedEntry>,
    /// Sum of every count in the ledger, not only the shown entries
    pub total_submissions: u64,
}

impl Leaderboard {
    /// Rank a snapshot, keeping the top `limit` entries
    ///
    /// Ties keep their snapshot order. Users whose count dropped to zero still rank.
    pub fn rank(snapshot: &[(Snowflake, u32)], limit: usize) -> Self {
        let total_submissions = snapshot.iter().map(|(_, c)| u64::from(*c)).sum();

        let mut sorted = snapshot.to_vec();
        // Stable sort keeps first-seen order within a tie
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(limit);

        let mut entries: Vec<RankedEntry> = Vec::with_capacity(sorted.len());
        for (position, (user_id, count)) in sorted.into_iter().enumerate() {
            let rank = match entries.last() {
                Some(prev) if prev.count == count => prev.rank,
                _ => position + 1,
            };
            entries.push(RankedEntry::new(user_id, count, rank));
        }

        Self {
            entries,
            total_submissions,
        }
    }

    /// Entries split into blocks for delivery; ranks stay global
    pub fn chunks(&self, size: usize) -> impl Iterator<Item = &[RankedEntry]> {
        self.entries.chunks(size.max(1))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
