//! Message registry record model

use potd_core::Snowflake;
use serde::{Deserialize, Serialize};

/// On-disk form of the message registry: `{"messageList": ["<id>", ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRecord {
    #[serde(default)]
    pub message_list: Vec<Snowflake>,
}
