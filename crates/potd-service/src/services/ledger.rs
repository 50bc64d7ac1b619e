//! Reaction ledger
//!
//! In-memory per-user completion counts. Built by a backfill scan, then kept current
//! by live reaction events. Not persisted.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use potd_core::Snowflake;

/// Ledger shared between the live event path and the leaderboard path
///
/// Every mutation is a short critical section; the lock is never held across an await.
pub type SharedLedger = Arc<Mutex<ReactionLedger>>;

/// Per-user completion counts, remembering first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionLedger {
    entries: Vec<(Snowflake, u32)>,
    positions: HashMap<Snowflake, usize>,
}

impl ReactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a ledger for sharing
    pub fn shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    /// Add one completion for `user_id`
    pub fn increment(&mut self, user_id: Snowflake) -> u32 {
        match self.positions.get(&user_id) {
            Some(&pos) => {
                let count = &mut self.entries[pos].1;
                *count = count.saturating_add(1);
                *count
            }
            None => {
                self.positions.insert(user_id, self.entries.len());
                self.entries.push((user_id, 1));
                1
            }
        }
    }

    /// Remove one completion for `user_id`, never going below zero
    pub fn decrement(&mut self, user_id: Snowflake) -> u32 {
        match self.positions.get(&user_id) {
            Some(&pos) => {
                let count = &mut self.entries[pos].1;
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        }
    }

    /// Current count for `user_id`
    pub fn count(&self, user_id: Snowflake) -> u32 {
        self.positions
            .get(&user_id)
            .map_or(0, |&pos| self.entries[pos].1)
    }

    /// Drop every entry
    pub fn reset(&mut self) {
        self.entries.clear();
        self.positions.clear();
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(user, count)` pairs in first-seen order
    pub fn snapshot(&self) -> Vec<(Snowflake, u32)> {
        self.entries.clone()
    }
}
