//! JSON file access with atomic replacement

mod json_file;

pub use json_file::{JsonFile, StoreError};
