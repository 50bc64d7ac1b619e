//! Dispatch payloads
//!
//! Only the fields the bot reads. Reaction payloads convert into the domain's
//! `LiveReactionEvent`.

use potd_core::{LiveReactionEvent, Snowflake};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: Snowflake,
    #[serde(default)]
    pub bot: bool,
}

/// `READY`
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyPayload {
    pub user: UserRef,
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmojiRef {
    /// Present for custom emoji only
    pub id: Option<Snowflake>,
    pub name: Option<String>,
}

impl EmojiRef {
    /// Name used for allow-list matching; custom emoji never match
    fn unicode_name(&self) -> String {
        match (&self.id, &self.name) {
            (None, Some(name)) => name.clone(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberRef {
    pub user: Option<UserRef>,
}

/// `MESSAGE_REACTION_ADD`
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionAddPayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    /// Only sent for reactions in guilds
    pub member: Option<MemberRef>,
    pub emoji: EmojiRef,
}

impl From<ReactionAddPayload> for LiveReactionEvent {
    fn from(payload: ReactionAddPayload) -> Self {
        let is_bot = payload
            .member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .is_some_and(|u| u.bot);

        LiveReactionEvent::added(
            payload.channel_id,
            payload.message_id,
            payload.user_id,
            payload.emoji.unicode_name(),
            is_bot,
        )
    }
}

/// `MESSAGE_REACTION_REMOVE`
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionRemovePayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub emoji: EmojiRef,
}

impl From<ReactionRemovePayload> for LiveReactionEvent {
    fn from(payload: ReactionRemovePayload) -> Self {
        LiveReactionEvent::removed(
            payload.channel_id,
            payload.message_id,
            payload.user_id,
            payload.emoji.unicode_name(),
        )
    }
}
