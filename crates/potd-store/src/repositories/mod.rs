//! Store implementations
//!
//! File-backed implementations of the state store traits defined in potd-core.

mod cursor;
mod error;
mod registry;

pub use cursor::JsonCursorStore;
pub use registry::JsonMessageRegistryStore;
