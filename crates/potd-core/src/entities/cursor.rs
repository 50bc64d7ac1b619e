//! Cursor entity - persisted pointer into the question sheet

use serde::{Deserialize, Serialize};

/// Position of the next unconsumed question row plus the next POTD number
///
/// Both fields are 1-based and never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    /// 1-based row index within the question range
    pub next_index: u32,
    /// Human-facing number of the next announcement
    pub next_sequence: u32,
}

impl Cursor {
    /// Create a cursor, clamping both fields to at least 1
    #[must_use]
    pub fn new(next_index: u32, next_sequence: u32) -> Self {
        Self {
            next_index: next_index.max(1),
            next_sequence: next_sequence.max(1),
        }
    }

    /// Cursor after a holiday row: skip one row, keep the sequence number
    #[must_use]
    pub fn after_holiday(self) -> Self {
        Self {
            next_index: self.next_index.saturating_add(1),
            next_sequence: self.next_sequence,
        }
    }

    /// Cursor after a consumed batch of `batch_size` rows
    #[must_use]
    pub fn after_batch(self, batch_size: u32) -> Self {
        Self {
            next_index: self.next_index.saturating_add(batch_size),
            next_sequence: self.next_sequence.saturating_add(1),
        }
    }

    /// Zero-based offset of `next_index` into a row list
    #[inline]
    pub fn row_offset(&self) -> usize {
        self.next_index.saturating_sub(1) as usize
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            next_index: 1,
            next_sequence: 1,
        }
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}, {}}}", self.next_index, self.next_sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cursor() {
        assert_eq!(Cursor::default(), Cursor::new(1, 1));
    }

    #[test]
    fn test_new_clamps_zero() {
        let cursor = Cursor::new(0, 0);
        assert_eq!(cursor.next_index, 1);
        assert_eq!(cursor.next_sequence, 1);
    }

    #[test]
    fn test_after_holiday() {
        let cursor = Cursor::new(5, 3).after_holiday();
        assert_eq!(cursor, Cursor::new(6, 3));
    }

    #[test]
    fn test_after_batch() {
        let cursor = Cursor::new(1, 1).after_batch(2);
        assert_eq!(cursor, Cursor::new(3, 2));
    }

    #[test]
    fn test_row_offset() {
        assert_eq!(Cursor::new(1, 1).row_offset(), 0);
        assert_eq!(Cursor::new(7, 1).row_offset(), 6);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Cursor::new(3, 2)).unwrap();
        assert_eq!(json, serde_json::json!({"nextIndex": 3, "nextSequence": 2}));
    }
}
