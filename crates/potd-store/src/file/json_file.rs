//! A single JSON document on disk

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// File store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// JSON document replaced as a whole on every write
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the next version is staged at before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read and parse the document; `Ok(None)` when the file does not exist
    pub async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::json(&self.path, e))
    }

    /// Replace the document
    ///
    /// The new contents are flushed to a staging file and renamed over the target,
    /// so readers observe either the old or the new document, never a partial one.
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::json(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let staging = self.staging_path();
        let mut file = fs::File::create(&staging)
            .await
            .map_err(|e| StoreError::io(&staging, e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| StoreError::io(&staging, e))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::io(&staging, e))?;
        drop(file);

        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: u32,
    }

    #[tokio::test]
    async fn test_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("absent.json"));

        let doc: Option<Doc> = file.read().await.unwrap();
        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("doc.json"));

        file.write(&Doc { value: 7 }).await.unwrap();
        file.write(&Doc { value: 8 }).await.unwrap();

        let doc: Option<Doc> = file.read().await.unwrap();
        assert_eq!(doc, Some(Doc { value: 8 }));
        assert!(!file.staging_path().exists());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = JsonFile::new(dir.path().join("state/nested/doc.json"));

        file.write(&Doc { value: 1 }).await.unwrap();
        assert!(file.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{not json").unwrap();

        let result: Result<Option<Doc>, _> = JsonFile::new(&path).read().await;
        assert!(matches!(result, Err(StoreError::Json { .. })));
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let file = JsonFile::new("/var/lib/potd/lastFetchedIndex.json");
        assert_eq!(
            file.staging_path(),
            PathBuf::from("/var/lib/potd/lastFetchedIndex.json.tmp")
        );
    }
}
