//! Events - reaction notifications delivered while the bot is running

mod reaction_event;

pub use reaction_event::{LiveReactionEvent, ReactionEventKind};
