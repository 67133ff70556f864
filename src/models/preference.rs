use serde::{Deserialize, Serialize};

/// Per-user visibility policy for system announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub user_id: i64,
    /// When set, only high-priority announcements are shown.
    pub block_non_critical: bool,
}

impl Preference {
    /// Key under which the policy is stored in the key-value store.
    pub fn storage_key(user_id: i64) -> String {
        format!("block_system_notifications_{user_id}")
    }
}
