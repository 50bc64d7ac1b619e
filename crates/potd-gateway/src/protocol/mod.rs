//! Gateway protocol definitions
//!
//! Op codes, the frame envelope, close codes, intents, and the payloads the bot
//! sends or reads.

mod close_codes;
mod intents;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use intents::Intents;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
