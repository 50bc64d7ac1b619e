//! Dispatch events the bot reacts to

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{EmojiRef, MemberRef, ReactionAddPayload, ReactionRemovePayload, ReadyPayload, UserRef};
