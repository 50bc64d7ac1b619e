//! Wire shapes of the Discord objects the client reads and writes
//!
//! Only the fields the bot uses are declared; everything else is ignored.

use potd_core::{ChannelInfo, ChannelMessage, ReactionCount, ReactionUser, Snowflake};
use serde::{Deserialize, Serialize};

/// JSON error body, also used for rate limit responses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub code: Option<u32>,
    /// Seconds, possibly fractional
    pub retry_after: Option<f64>,
    #[serde(default)]
    pub global: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChannelDto {
    pub id: Snowflake,
    pub name: Option<String>,
}

impl From<ChannelDto> for ChannelInfo {
    fn from(dto: ChannelDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmojiDto {
    /// Present for custom emoji only
    pub id: Option<Snowflake>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReactionDto {
    pub count: u32,
    #[serde(default)]
    pub me: bool,
    pub emoji: EmojiDto,
}

#[derive(Debug, Deserialize)]
pub struct MessageDto {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub reactions: Vec<ReactionDto>,
}

impl From<MessageDto> for ChannelMessage {
    fn from(dto: MessageDto) -> Self {
        let reactions = dto
            .reactions
            .into_iter()
            // custom emoji never match the keycap allow-list
            .filter(|r| r.emoji.id.is_none())
            .filter_map(|r| {
                let name = r.emoji.name?;
                Some(ReactionCount::new(name, r.count, r.me))
            })
            .collect();

        Self {
            id: dto.id,
            channel_id: dto.channel_id,
            reactions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageIdDto {
    pub id: Snowflake,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: Snowflake,
    #[serde(default)]
    pub bot: bool,
}

impl From<UserDto> for ReactionUser {
    fn from(dto: UserDto) -> Self {
        Self::new(dto.id, dto.bot)
    }
}

/// `POST /channels/{channel}/messages` body
#[derive(Debug, Serialize)]
pub struct CreateMessage<'a> {
    pub content: &'a str,
    pub allowed_mentions: AllowedMentions,
}

/// Mentions that may ping; user mentions in leaderboard lines stay silent
#[derive(Debug, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<&'static str>,
}

impl<'a> CreateMessage<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            allowed_mentions: AllowedMentions { parse: vec!["roles"] },
        }
    }
}
