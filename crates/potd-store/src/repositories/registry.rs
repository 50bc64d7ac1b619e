//! File-backed implementation of MessageRegistryStore

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use potd_core::traits::{MessageRegistryStore, PortResult};
use potd_core::value_objects::Snowflake;

use crate::file::JsonFile;
use crate::models::RegistryRecord;

use super::error::map_store_error;

/// Message registry persisted as `{"messageList": [...]}`
#[derive(Debug, Clone)]
pub struct JsonMessageRegistryStore {
    file: JsonFile,
}

impl JsonMessageRegistryStore {
    /// Create a new JsonMessageRegistryStore
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

#[async_trait]
impl MessageRegistryStore for JsonMessageRegistryStore {
    #[instrument(skip(self), fields(path = %self.file.path().display()))]
    async fn load_all(&self) -> Vec<Snowflake> {
        match self.file.read::<RegistryRecord>().await {
            Ok(Some(record)) => record.into(),
            Ok(None) => {
                debug!("No message registry yet");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Unreadable message registry, treating as empty");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self, ids), fields(path = %self.file.path().display(), count = ids.len()))]
    async fn save_all(&self, ids: &[Snowflake]) -> PortResult<()> {
        self.file
            .write(&RegistryRecord::from(ids))
            .await
            .map_err(map_store_error)
    }
}
