//! Discord REST client

use std::time::Duration;

use async_trait::async_trait;
use potd_common::DiscordConfig;
use potd_core::{
    ChannelInfo, ChannelMessage, ChatClient, PortResult, ReactionUser, Snowflake, TaskEmoji,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::dto::{ChannelDto, CreateMessage, MessageDto, MessageIdDto, UserDto};
use crate::error::{map_status_error, map_transport_error, ChatError, Target};
use crate::routes::Routes;

const DEFAULT_USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Bot-token authenticated client for the Discord HTTP API
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: Client,
    routes: Routes,
}

impl DiscordClient {
    /// Build a client from the Discord section of the app config
    pub fn new(config: &DiscordConfig) -> Result<Self, ChatError> {
        Self::with_base(
            &config.api_base,
            &config.token,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Build a client against an explicit API base
    pub fn with_base(api_base: &str, token: &str, timeout: Duration) -> Result<Self, ChatError> {
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| ChatError::Transport("bot token is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(map_transport_error)?;

        Ok(Self {
            http,
            routes: Routes::new(api_base)?,
        })
    }

    /// Send and decode a JSON response
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ChatError> {
        let body = self.execute_raw(request).await?;
        serde_json::from_slice(&body).map_err(|e| ChatError::Decode(e.to_string()))
    }

    /// Send and return the raw body of a successful response
    async fn execute_raw(&self, request: RequestBuilder) -> Result<Vec<u8>, ChatError> {
        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let err = map_status_error(status, retry_after.as_deref(), &body);
            debug!(status = status.as_u16(), error = %err, "Discord request failed");
            return Err(err);
        }
        Ok(body.to_vec())
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url)
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    #[instrument(skip(self))]
    async fn fetch_channel(&self, channel_id: Snowflake) -> PortResult<ChannelInfo> {
        self.execute::<ChannelDto>(self.get(self.routes.channel(channel_id)))
            .await
            .map(Into::into)
            .map_err(|e| e.into_domain(Target::Channel(channel_id)))
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<Snowflake> {
        let request = self
            .http
            .post(self.routes.messages(channel_id))
            .json(&CreateMessage::new(content));

        self.execute::<MessageIdDto>(request)
            .await
            .map(|m| m.id)
            .map_err(|e| e.into_domain(Target::Channel(channel_id)))
    }

    #[instrument(skip(self))]
    async fn react_to_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
    ) -> PortResult<()> {
        let request = self
            .http
            .put(self.routes.own_reaction(channel_id, message_id, emoji))
            .body(Vec::<u8>::new());

        self.execute_raw(request)
            .await
            .map(|_| ())
            .map_err(|e| {
                e.into_domain(Target::Message {
                    channel_id,
                    message_id,
                })
            })
    }

    #[instrument(skip(self))]
    async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<ChannelMessage> {
        self.execute::<MessageDto>(self.get(self.routes.message(channel_id, message_id)))
            .await
            .map(Into::into)
            .map_err(|e| {
                e.into_domain(Target::Message {
                    channel_id,
                    message_id,
                })
            })
    }

    #[instrument(skip(self))]
    async fn fetch_reaction_users(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: TaskEmoji,
        after: Option<Snowflake>,
        limit: u32,
    ) -> PortResult<Vec<ReactionUser>> {
        let mut request = self
            .get(self.routes.reactions(channel_id, message_id, emoji))
            .query(&[("limit", limit.to_string())]);
        if let Some(after) = after {
            request = request.query(&[("after", after.to_string())]);
        }

        self.execute::<Vec<UserDto>>(request)
            .await
            .map(|users| users.into_iter().map(Into::into).collect())
            .map_err(|e| {
                e.into_domain(Target::Message {
                    channel_id,
                    message_id,
                })
            })
    }

    #[instrument(skip(self))]
    async fn fetch_channel_messages(
        &self,
        channel_id: Snowflake,
        before: Option<Snowflake>,
        limit: u32,
    ) -> PortResult<Vec<Snowflake>> {
        let mut request = self
            .get(self.routes.messages(channel_id))
            .query(&[("limit", limit.to_string())]);
        if let Some(before) = before {
            request = request.query(&[("before", before.to_string())]);
        }

        self.execute::<Vec<MessageIdDto>>(request)
            .await
            .map(|messages| messages.into_iter().map(|m| m.id).collect())
            .map_err(|e| e.into_domain(Target::Channel(channel_id)))
    }
}
