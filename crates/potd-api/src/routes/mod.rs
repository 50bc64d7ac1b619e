//! Endpoint URLs
//!
//! Every path is built segment by segment so emoji and ids are percent-encoded
//! exactly once.

use potd_core::{Snowflake, TaskEmoji};
use reqwest::Url;

use crate::error::ChatError;

/// URL builder rooted at the API base (e.g. `https://discord.com/api/v10`)
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
}

impl Routes {
    /// Parse the API base URL
    pub fn new(base: &str) -> Result<Self, ChatError> {
        let base = Url::parse(base).map_err(|e| ChatError::InvalidUrl(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ChatError::InvalidUrl(base.to_string()));
        }
        Ok(Self { base })
    }

    fn build<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /channels/{channel}`
    pub fn channel(&self, channel_id: Snowflake) -> Url {
        let channel = channel_id.to_string();
        self.build(["channels", channel.as_str()])
    }

    /// `GET|POST /channels/{channel}/messages`
    pub fn messages(&self, channel_id: Snowflake) -> Url {
        let channel = channel_id.to_string();
        self.build(["channels", channel.as_str(), "messages"])
    }

    /// `GET /channels/{channel}/messages/{message}`
    pub fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Url {
        let (channel, message) = (channel_id.to_string(), message_id.to_string());
        self.build(["channels", channel.as_str(), "messages", message.as_str()])
    }

    /// `GET /channels/{channel}/messages/{message}/reactions/{emoji}`
    pub fn reactions(&self, channel_id: Snowflake, message_id: Snowflake, emoji: TaskEmoji) -> Url {
        let (channel, message) = (channel_id.to_string(), message_id.to_string());
        self.build([
            "channels",
            channel.as_str(),
            "messages",
            message.as_str(),
            "reactions",
            emoji.as_str(),
        ])
    }

    /// `PUT /channels/{channel}/messages/{message}/reactions/{emoji}/@me`
    pub fn own_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
    ) -> Url {
        let mut url = self.reactions(channel_id, message_id, emoji);
        if let Ok(mut path) = url.path_segments_mut() {
            path.push("@me");
        }
        url
    }
}
