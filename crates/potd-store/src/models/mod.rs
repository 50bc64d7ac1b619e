//! On-disk record models - serde structs for the persisted JSON files

mod cursor;
mod registry;

pub use cursor::CursorRecord;
pub use registry::RegistryRecord;
