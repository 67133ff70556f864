use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Offset added to an announcement's native id when a flat integer id is needed.
pub const ANNOUNCEMENT_ID_OFFSET: i64 = 10_000;

/// Identity of a feed item, tagged by origin so base and announcement ids never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "origin", content = "id", rename_all = "lowercase")]
pub enum NotificationId {
    Base(i64),
    Announcement(i64),
}

impl NotificationId {
    /// Legacy flat integer: announcements are shifted by [`ANNOUNCEMENT_ID_OFFSET`],
    /// clamped at `i64::MAX`.
    pub fn flat(&self) -> i64 {
        match self {
            NotificationId::Base(id) => *id,
            NotificationId::Announcement(id) => id.saturating_add(ANNOUNCEMENT_ID_OFFSET),
        }
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flat())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Assignment,
    Exam,
    Question,
    Review,
    Notice,
    Announcement,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    pub link: Option<String>,
    pub course_id: Option<i64>,
    pub course_title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// Client-side route of the role's notifications page.
    pub fn notifications_route(&self) -> &'static str {
        match self {
            Role::Student => "/student/notifications",
            Role::Instructor => "/instructor/notifications",
            Role::Admin => "/admin/notifications",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "학생",
            Role::Instructor => "강사",
            Role::Admin => "관리자",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
}

impl NotificationFilter {
    pub fn cycle(&self) -> Self {
        match self {
            NotificationFilter::All => NotificationFilter::Unread,
            NotificationFilter::Unread => NotificationFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NotificationFilter::All => "전체",
            NotificationFilter::Unread => "읽지 않음",
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.read,
        }
    }
}
