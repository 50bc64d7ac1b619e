//! # potd-core
//!
//! Domain layer containing entities, value objects, collaborator traits, and live events.
//! This crate has zero dependencies on infrastructure (HTTP clients, file system, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChannelInfo, ChannelMessage, Cursor, QuestionBatch, QuestionRow, RankedEntry, ReactionCount,
    ReactionUser, Settings,
};
pub use error::DomainError;
pub use events::{LiveReactionEvent, ReactionEventKind};
pub use traits::{
    ChatClient, CursorStore, MessageRegistryStore, PortResult, QuestionSource, SettingsSource,
};
pub use value_objects::{Snowflake, SnowflakeParseError, TaskEmoji};
