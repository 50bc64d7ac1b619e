//! Value objects - immutable types that represent domain concepts

mod snowflake;
mod task_emoji;

pub use snowflake::{Snowflake, SnowflakeParseError};
pub use task_emoji::TaskEmoji;
