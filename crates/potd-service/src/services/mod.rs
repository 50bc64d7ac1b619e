//! POTD services
//!
//! Sequencing, the reaction ledger with its backfill and live paths, ranking, and
//! the use cases that tie them to the collaborators in the context.

pub mod announcement;
pub mod backfill;
pub mod context;
pub mod error;
pub mod leaderboard;
pub mod ledger;
pub mod live;
pub mod pagination;
pub mod potd;
pub mod ranker;
pub mod registry;
pub mod sequencer;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export all services for convenience
pub use announcement::{format_announcement, HOLIDAY_MESSAGE};
pub use backfill::{BackfillService, BackfillStats};
pub use context::{ServiceContext, ServiceContextBuilder, ServiceOptions};
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::{format_messages, LeaderboardReport, LeaderboardService};
pub use ledger::{ReactionLedger, SharedLedger};
pub use live::{IgnoreReason, LiveOutcome, LiveReactionService, LiveState};
pub use potd::{PotdReport, PotdService};
pub use ranker::Leaderboard;
pub use registry::MessageRegistry;
pub use sequencer::{Decision, Outcome, SequencerService};
