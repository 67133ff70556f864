use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

use crate::models::NotificationType;

const DEFAULT_ICON: &str = "🔔";

/// Relative label for `created_at` as seen at `now`. Past a week it falls
/// back to a local month/day date.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    time_ago_in(created_at, now, &Local)
}

pub fn time_ago_in<Tz: TimeZone>(created_at: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String {
    let minutes = (now - created_at).num_minutes();

    if minutes < 1 {
        return "방금 전".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}분 전");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}시간 전");
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{days}일 전");
    }

    let local = created_at.with_timezone(tz);
    format!("{}월 {}일", local.month(), local.day())
}

pub fn icon_for(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::Assignment => "📝",
        NotificationType::Exam => "📋",
        NotificationType::Question => "❓",
        NotificationType::Review => "⭐",
        NotificationType::Notice => "📢",
        NotificationType::Announcement => "📣",
        NotificationType::Other => DEFAULT_ICON,
    }
}

pub fn label_for(kind: NotificationType) -> &'static str {
    match kind {
        NotificationType::Assignment => "과제",
        NotificationType::Exam => "시험",
        NotificationType::Question => "질문",
        NotificationType::Review => "리뷰",
        NotificationType::Notice => "공지",
        NotificationType::Announcement => "시스템 공지",
        NotificationType::Other => "알림",
    }
}
