//! Question entities - rows read from the question sheet

/// Label that marks a no-POTD day
const HOLIDAY_LABEL: &str = "holiday";

/// One question row: a display label and a problem link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRow {
    pub label: String,
    pub link: String,
}

impl QuestionRow {
    /// Create a new QuestionRow
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
        }
    }

    /// Check if this row is the holiday sentinel (case-insensitive, trimmed)
    pub fn is_holiday(&self) -> bool {
        self.label.trim().eq_ignore_ascii_case(HOLIDAY_LABEL)
    }
}

/// Questions announced together under one POTD number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBatch {
    pub sequence: u32,
    pub questions: Vec<QuestionRow>,
}

impl QuestionBatch {
    /// Create a new QuestionBatch
    pub fn new(sequence: u32, questions: Vec<QuestionRow>) -> Self {
        Self {
            sequence,
            questions,
        }
    }

    /// Number of tasks in the batch
    #[inline]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if the batch has no tasks
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holiday_detection() {
        assert!(QuestionRow::new("holiday", "").is_holiday());
        assert!(QuestionRow::new("  Holiday ", "").is_holiday());
        assert!(QuestionRow::new("HOLIDAY", "x").is_holiday());
        assert!(!QuestionRow::new("Holiday Special", "").is_holiday());
        assert!(!QuestionRow::new("Two Sum", "https://example.com").is_holiday());
    }

    #[test]
    fn test_batch_len() {
        let batch = QuestionBatch::new(
            4,
            vec![QuestionRow::new("A", "a"), QuestionRow::new("B", "b")],
        );
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.sequence, 4);
    }
}
