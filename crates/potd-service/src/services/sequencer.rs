//! Question sequencer
//!
//! Decides from the question rows and the cursor whether today is a question batch,
//! a holiday, or nothing, and computes the advanced cursor. Persisting that cursor
//! is the caller's job.

use potd_core::{Cursor, QuestionBatch, QuestionRow};
use tracing::{debug, error, instrument, warn};

use super::context::ServiceContext;

/// What a trigger produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The row at the cursor is the holiday sentinel
    Holiday,
    /// A full batch of questions under a POTD number
    Batch(QuestionBatch),
    /// Nothing to announce
    Empty,
}

/// An outcome plus the cursor to persist afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: Outcome,
    pub cursor: Cursor,
}

impl Decision {
    fn empty(cursor: Cursor) -> Self {
        Self {
            outcome: Outcome::Empty,
            cursor,
        }
    }

    /// Whether the cursor moved
    pub fn advanced(&self, from: Cursor) -> bool {
        self.cursor != from
    }
}

/// Decide purely from `rows`
///
/// `rows[0]` is the row at index 1. A batch is only produced when `batch_size`
/// complete rows are available at the cursor; anything short of that is `Empty`
/// and leaves the cursor where it is.
pub fn plan(rows: &[QuestionRow], cursor: Cursor, batch_size: u32) -> Decision {
    let offset = cursor.row_offset();

    let Some(first) = rows.get(offset) else {
        debug!(rows = rows.len(), next_index = cursor.next_index, "No row at cursor");
        return Decision::empty(cursor);
    };

    if first.is_holiday() {
        return Decision {
            outcome: Outcome::Holiday,
            cursor: cursor.after_holiday(),
        };
    }

    let size = batch_size as usize;
    let Some(batch) = rows.get(offset..offset + size) else {
        warn!(
            available = rows.len() - offset,
            batch_size, "Incomplete batch at the end of the sheet"
        );
        return Decision::empty(cursor);
    };

    if let Some(bad) = batch
        .iter()
        .position(|row| row.label.trim().is_empty() || row.link.trim().is_empty())
    {
        // Nothing posts until the sheet row is fixed
        error!(
            row = cursor.next_index as usize + bad,
            "Question row without label or link, announcements stalled"
        );
        return Decision::empty(cursor);
    }

    Decision {
        outcome: Outcome::Batch(QuestionBatch::new(cursor.next_sequence, batch.to_vec())),
        cursor: cursor.after_batch(batch_size),
    }
}

/// Sequencer service
pub struct SequencerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SequencerService<'a> {
    /// Create a new SequencerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch all rows once and decide for `cursor`
    ///
    /// A source failure is logged and yields `Empty` with the cursor unchanged.
    #[instrument(skip(self), fields(cursor = %cursor))]
    pub async fn decide(&self, cursor: Cursor) -> Decision {
        match self.ctx.question_source().fetch_rows().await {
            Ok(rows) => plan(&rows, cursor, self.ctx.options().batch_size),
            Err(e) => {
                warn!(error = %e, code = e.code(), "Question source failed, nothing consumed");
                Decision::empty(cursor)
            }
        }
    }
}
