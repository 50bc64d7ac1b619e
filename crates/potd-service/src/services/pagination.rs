//! Lazy page streams over the chat platform's cursor-paginated endpoints
//!
//! Each stream fetches one page per poll and ends at the first empty page.
//! Pacing is left to the consumer.

use futures::stream::{self, Stream};
use potd_core::{ChatClient, PortResult, ReactionUser, Snowflake, TaskEmoji};

/// Where the next page starts
enum PageCursor {
    Start,
    /// Exclusive bound: `after` for reactions, `before` for history
    After(Snowflake),
}

impl PageCursor {
    fn bound(&self) -> Option<Snowflake> {
        match self {
            Self::Start => None,
            Self::After(id) => Some(*id),
        }
    }
}

/// Pages of users who reacted to `message_id` with `emoji`, in ascending id order
pub fn reaction_user_pages<'a>(
    chat: &'a dyn ChatClient,
    channel_id: Snowflake,
    message_id: Snowflake,
    emoji: TaskEmoji,
    page_size: u32,
) -> impl Stream<Item = PortResult<Vec<ReactionUser>>> + Send + 'a {
    stream::try_unfold(PageCursor::Start, move |cursor| {
        next_reaction_page(chat, channel_id, message_id, emoji, page_size, cursor)
    })
}

async fn next_reaction_page(
    chat: &dyn ChatClient,
    channel_id: Snowflake,
    message_id: Snowflake,
    emoji: TaskEmoji,
    page_size: u32,
    cursor: PageCursor,
) -> PortResult<Option<(Vec<ReactionUser>, PageCursor)>> {
    let page = chat
        .fetch_reaction_users(channel_id, message_id, emoji, cursor.bound(), page_size)
        .await?;

    let next = match page.iter().map(|u| u.id).max() {
        Some(last) => PageCursor::After(last),
        None => return Ok(None),
    };
    Ok(Some((page, next)))
}

/// Pages of message ids in `channel_id`, newest first
pub fn message_id_pages<'a>(
    chat: &'a dyn ChatClient,
    channel_id: Snowflake,
    page_size: u32,
) -> impl Stream<Item = PortResult<Vec<Snowflake>>> + Send + 'a {
    stream::try_unfold(PageCursor::Start, move |cursor| {
        next_message_page(chat, channel_id, page_size, cursor)
    })
}

async fn next_message_page(
    chat: &dyn ChatClient,
    channel_id: Snowflake,
    page_size: u32,
    cursor: PageCursor,
) -> PortResult<Option<(Vec<Snowflake>, PageCursor)>> {
    let page = chat
        .fetch_channel_messages(channel_id, cursor.bound(), page_size)
        .await?;

    let next = match page.iter().copied().min() {
        Some(oldest) => PageCursor::After(oldest),
        None => return Ok(None),
    };
    Ok(Some((page, next)))
}
