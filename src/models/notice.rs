use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStatus {
    Active,
    Inactive,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticePriority {
    Low,
    Medium,
    High,
    #[serde(other)]
    Other,
}

/// A system-wide notice as returned by the notices API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotice {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_date: String,
    pub status: NoticeStatus,
    pub priority: NoticePriority,
    pub author: Option<String>,
}

impl RawNotice {
    pub fn is_active(&self) -> bool {
        self.status == NoticeStatus::Active
    }

    pub fn is_critical(&self) -> bool {
        self.priority == NoticePriority::High
    }
}
