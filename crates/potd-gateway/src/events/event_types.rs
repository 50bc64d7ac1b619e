//! Gateway event types
//!
//! Names carried in the `t` field of dispatch frames. Every other event is
//! ignored.

use std::fmt;

/// Dispatch events the bot handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    /// Sent after a successful Identify
    Ready,
    /// Reaction added to a message
    MessageReactionAdd,
    /// Reaction removed from a message
    MessageReactionRemove,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
        }
    }

    /// Parse an event name, `None` for events the bot ignores
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "READY" => Some(Self::Ready),
            "MESSAGE_REACTION_ADD" => Some(Self::MessageReactionAdd),
            "MESSAGE_REACTION_REMOVE" => Some(Self::MessageReactionRemove),
            _ => None,
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
