//! # potd-store
//!
//! Persistence layer implementing the state store traits with JSON files.
//!
//! ## Overview
//!
//! Two independent records are kept on disk:
//!
//! - the cursor (`{"nextIndex": 3, "nextSequence": 2}`)
//! - the message registry (`{"messageList": ["1234", ...]}`)
//!
//! Loads fail soft: a missing or corrupt file yields the default value.
//! Saves replace the whole file atomically (write to a sibling temp file, then rename)
//! and propagate every error.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use potd_store::JsonCursorStore;
//! use potd_core::CursorStore;
//!
//! async fn example() -> Result<(), potd_core::DomainError> {
//!     let store = JsonCursorStore::new("lastFetchedIndex.json");
//!     let cursor = store.load().await;
//!     store.save(&cursor.after_holiday()).await
//! }
//! ```

pub mod file;
pub mod mappers;
pub mod models;
pub mod repositories;

// Re-export commonly used types
pub use file::{JsonFile, StoreError};
pub use repositories::{JsonCursorStore, JsonMessageRegistryStore};
