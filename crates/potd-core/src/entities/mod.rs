//! Domain entities - core business objects

mod cursor;
mod leaderboard;
mod message;
mod question;
mod reaction;
mod settings;

pub use cursor::Cursor;
pub use leaderboard::RankedEntry;
pub use message::{ChannelInfo, ChannelMessage};
pub use question::{QuestionBatch, QuestionRow};
pub use reaction::{ReactionCount, ReactionUser};
pub use settings::Settings;
