//! File-backed implementation of CursorStore

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use potd_core::entities::Cursor;
use potd_core::traits::{CursorStore, PortResult};

use crate::file::JsonFile;
use crate::models::CursorRecord;

use super::error::map_store_error;

/// Cursor persisted as a single JSON document
#[derive(Debug, Clone)]
pub struct JsonCursorStore {
    file: JsonFile,
}

impl JsonCursorStore {
    /// Create a new JsonCursorStore
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

#[async_trait]
impl CursorStore for JsonCursorStore {
    #[instrument(skip(self), fields(path = %self.file.path().display()))]
    async fn load(&self) -> Cursor {
        match self.file.read::<CursorRecord>().await {
            Ok(Some(record)) => Cursor::from(record),
            Ok(None) => {
                debug!("No persisted cursor, starting from the beginning");
                Cursor::default()
            }
            Err(e) => {
                warn!(error = %e, "Unreadable cursor, starting from the beginning");
                Cursor::default()
            }
        }
    }

    #[instrument(skip(self), fields(path = %self.file.path().display()))]
    async fn save(&self, cursor: &Cursor) -> PortResult<()> {
        self.file
            .write(&CursorRecord::from(cursor))
            .await
            .map_err(map_store_error)?;

        debug!(
            next_index = cursor.next_index,
            next_sequence = cursor.next_sequence,
            "Cursor saved"
        );
        Ok(())
    }
}
