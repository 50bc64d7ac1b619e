//! Gateway intents
//!
//! Bit set sent with Identify selecting which event groups the gateway delivers.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Discord gateway intents
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        /// Guild, channel and role lifecycle
        const GUILDS                  = 1 << 0;
        /// Guild message create/update/delete
        const GUILD_MESSAGES          = 1 << 9;
        /// Reaction add/remove in guild channels
        const GUILD_MESSAGE_REACTIONS = 1 << 10;

        /// What the bot subscribes to
        const POTD = Self::GUILDS.bits() | Self::GUILD_MESSAGE_REACTIONS.bits();
    }
}

impl Default for Intents {
    fn default() -> Self {
        Self::POTD
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potd_intents() {
        assert_eq!(Intents::POTD.bits(), 1025);
        assert!(Intents::default().contains(Intents::GUILD_MESSAGE_REACTIONS));
        assert!(!Intents::default().contains(Intents::GUILD_MESSAGES));
    }

    #[test]
    fn test_serialized_as_number() {
        assert_eq!(serde_json::to_string(&Intents::POTD).unwrap(), "1025");
    }
}
