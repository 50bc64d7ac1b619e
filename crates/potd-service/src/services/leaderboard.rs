//! Leaderboard publication

use std::fmt::Write;

use potd_core::Settings;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::ranker::Leaderboard;

/// What publishing the leaderboard did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardReport {
    /// Leaderboard delivery is switched off in the settings
    Disabled,
    Published {
        messages_sent: usize,
        entries: usize,
        total_submissions: u64,
    },
    /// A send failed; later chunks were not attempted
    Interrupted { messages_sent: usize },
}

/// Render the leaderboard as one message per chunk
///
/// The first message carries the heading and the submission total.
pub fn format_messages(board: &Leaderboard, chunk_size: usize) -> Vec<String> {
    let mut header = String::from("# Leaderboard\n");
    let _ = writeln!(header, "Total submissions: {}", board.total_submissions);

    if board.is_empty() {
        header.push_str("\nNo submissions yet.");
        return vec![header];
    }

    board
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| {
            let mut text = if i == 0 {
                header.clone() + "\n"
            } else {
                String::new()
            };
            for entry in chunk {
                let _ = writeln!(text, "{}. <@{}> : {}", entry.rank, entry.user_id, entry.count);
            }
            text.trim_end().to_string()
        })
        .collect()
}

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    /// Create a new LeaderboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Rank the current ledger
    pub fn current(&self) -> Leaderboard {
        let snapshot = self.ctx.ledger().lock().snapshot();
        Leaderboard::rank(&snapshot, self.ctx.options().leaderboard_limit)
    }

    /// Rank, format, and send to the leaderboard channel
    #[instrument(skip(self, settings), fields(channel_id = %settings.leaderboard_channel_id))]
    pub async fn publish(&self, settings: &Settings) -> LeaderboardReport {
        if !settings.leaderboard_enabled {
            info!("Leaderboard disabled, nothing sent");
            return LeaderboardReport::Disabled;
        }

        let board = self.current();
        let messages = format_messages(&board, self.ctx.options().leaderboard_chunk_size);
        let channel_id = settings.leaderboard_channel_id;

        if let Err(e) = self.ctx.chat().fetch_channel(channel_id).await {
            warn!(error = %e, "Leaderboard channel unavailable");
            return LeaderboardReport::Interrupted { messages_sent: 0 };
        }

        for (sent, text) in messages.iter().enumerate() {
            if let Err(e) = self.ctx.chat().send_message(channel_id, text).await {
                warn!(error = %e, chunk = sent, "Failed to send leaderboard");
                return LeaderboardReport::Interrupted { messages_sent: sent };
            }
        }

        info!(
            entries = board.entries.len(),
            total_submissions = board.total_submissions,
            messages = messages.len(),
            "Leaderboard published"
        );
        LeaderboardReport::Published {
            messages_sent: messages.len(),
            entries: board.entries.len(),
            total_submissions: board.total_submissions,
        }
    }
}
