//! Cursor entity <-> record mapper

use potd_core::Cursor;

use crate::models::CursorRecord;

/// Convert a stored record into a cursor, filling gaps with the defaults
impl From<CursorRecord> for Cursor {
    fn from(record: CursorRecord) -> Self {
        Cursor::new(
            record.next_index.unwrap_or(1),
            record.next_sequence.unwrap_or(1),
        )
    }
}

impl From<&Cursor> for CursorRecord {
    fn from(cursor: &Cursor) -> Self {
        CursorRecord {
            next_index: Some(cursor.next_index),
            next_sequence: Some(cursor.next_sequence),
        }
    }
}
