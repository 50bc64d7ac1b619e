//! Collaborator traits (ports) - define what the domain needs from the outside world
//!
//! The domain layer defines these interfaces and the adapter crates provide the
//! implementations (spreadsheet, chat platform, file storage).

use async_trait::async_trait;

use crate::entities::{
    ChannelInfo, ChannelMessage, Cursor, QuestionRow, ReactionUser, Settings,
};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, TaskEmoji};

/// Result type for collaborator operations
pub type PortResult<T> = Result<T, DomainError>;

// ============================================================================
// Question Source
// ============================================================================

#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every row of the configured question range, in sheet order
    async fn fetch_rows(&self) -> PortResult<Vec<QuestionRow>>;
}

// ============================================================================
// Settings Source
// ============================================================================

#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// Fetch the current routing settings
    ///
    /// Any error here is a configuration failure and must stop the caller.
    async fn fetch(&self) -> PortResult<Settings>;
}

// ============================================================================
// Persistent State
// ============================================================================

#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Load the cursor; unreadable or missing state yields `Cursor::default()`
    async fn load(&self) -> Cursor;

    /// Overwrite the persisted cursor
    async fn save(&self, cursor: &Cursor) -> PortResult<()>;
}

#[async_trait]
pub trait MessageRegistryStore: Send + Sync {
    /// Load all registered message ids; unreadable or missing state yields an empty list
    async fn load_all(&self) -> Vec<Snowflake>;

    /// Overwrite the registry with the given ids
    async fn save_all(&self, ids: &[Snowflake]) -> PortResult<()>;
}

// ============================================================================
// Chat Platform
// ============================================================================

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Fetch channel information (also verifies the bot can see it)
    async fn fetch_channel(&self, channel_id: Snowflake) -> PortResult<ChannelInfo>;

    /// Send a text message, returning the new message id
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<Snowflake>;

    /// Add the bot's own reaction to a message
    async fn react_to_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
    ) -> PortResult<()>;

    /// Fetch a single message including its reaction summary
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<ChannelMessage>;

    /// Fetch one page of users who reacted with `emoji`, ordered by id, strictly after `after`
    async fn fetch_reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
        after: Option<Snowflake>,
        limit: u32,
    ) -> PortResult<Vec<ReactionUser>>;

    /// Fetch one page of message ids, newest first, strictly before `before`
    async fn fetch_channel_messages(
        &self,
        channel_id: Snowflake,
        before: Option<Snowflake>,
        limit: u32,
    ) -> PortResult<Vec<Snowflake>>;
}
