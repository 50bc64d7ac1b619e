//! Entity to record mappers
//!
//! Conversions between domain values (potd-core) and on-disk records.

mod cursor;
mod registry;
