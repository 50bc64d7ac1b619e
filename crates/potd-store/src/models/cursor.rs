//! Cursor record model

use serde::{Deserialize, Serialize};

/// On-disk form of the cursor
///
/// Older deployments wrote `{"index": n, "potdNumber": m}`; both spellings are read,
/// only the camelCase one is written. Absent or zero fields read as 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorRecord {
    #[serde(default, alias = "index")]
    pub next_index: Option<u32>,
    #[serde(default, alias = "potdNumber")]
    pub next_sequence: Option<u32>,
}
