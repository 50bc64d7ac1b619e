//! Error handling utilities for stores

use potd_core::error::DomainError;

use crate::file::StoreError;

/// Convert a file store error to DomainError
pub fn map_store_error(e: StoreError) -> DomainError {
    DomainError::StorageError(e.to_string())
}
