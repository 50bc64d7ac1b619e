//! # potd-service
//!
//! Application layer: the question sequencer, the reaction ledger with backfill and
//! live reconciliation, leaderboard ranking, and the use cases the bot exposes.

pub mod services;

pub use services::{
    BackfillService, BackfillStats, IgnoreReason, Leaderboard, LeaderboardReport, LeaderboardService,
    LiveOutcome, LiveReactionService, LiveState, MessageRegistry, Outcome, PotdReport,
    PotdService, ReactionLedger, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceOptions, ServiceResult, SharedLedger,
};
