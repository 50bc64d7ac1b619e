//! Routing settings - fetched fresh for every trigger

use crate::value_objects::Snowflake;

/// Channel routing and feature flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Channel where announcements are posted and reactions are counted
    pub potd_channel_id: Snowflake,
    /// Channel used instead of the POTD channel in debug mode
    pub test_channel_id: Snowflake,
    /// Channel where the leaderboard is posted
    pub leaderboard_channel_id: Snowflake,
    /// Roles mentioned in each announcement
    pub role_ids: Vec<Snowflake>,
    /// Route announcements to the test channel and skip registration
    pub debug: bool,
    /// Whether leaderboard delivery is enabled
    pub leaderboard_enabled: bool,
}

impl Settings {
    /// Channel the next announcement goes to
    #[must_use]
    pub fn announcement_channel(&self) -> Snowflake {
        if self.debug {
            self.test_channel_id
        } else {
            self.potd_channel_id
        }
    }
}
