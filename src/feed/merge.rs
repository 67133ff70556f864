use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{Notification, NotificationId, NotificationType, RawNotice, Role};

/// Announcement messages longer than this many characters are cut.
pub const MESSAGE_PREVIEW_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Combine base notifications with announcements into one feed, newest first.
///
/// Inactive notices are always dropped. With `block_non_critical` set only
/// high-priority notices survive. Equal timestamps keep their input order,
/// announcements ahead of base items.
pub fn merge(
    base: &[Notification],
    raw_announcements: &[RawNotice],
    block_non_critical: bool,
    role: Role,
) -> Vec<Notification> {
    let mut feed: Vec<Notification> = raw_announcements
        .iter()
        .filter(|notice| notice.is_active())
        .filter(|notice| !block_non_critical || notice.is_critical())
        .map(|notice| announcement_to_notification(notice, role))
        .chain(base.iter().cloned())
        .collect();

    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    feed
}

fn announcement_to_notification(notice: &RawNotice, role: Role) -> Notification {
    let created_at = parse_datetime(&notice.created_date).unwrap_or_else(|| {
        tracing::warn!(
            "Notice {} has unparsable date {:?}, sorting it last",
            notice.id,
            notice.created_date
        );
        DateTime::<Utc>::MIN_UTC
    });

    Notification {
        id: NotificationId::Announcement(notice.id),
        kind: NotificationType::Announcement,
        title: notice.title.clone(),
        message: truncate_message(&notice.content),
        created_at,
        read: false,
        link: Some(role.notifications_route().to_string()),
        course_id: None,
        course_title: None,
    }
}

pub fn truncate_message(content: &str) -> String {
    match content.char_indices().nth(MESSAGE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], ELLIPSIS),
        None => content.to_string(),
    }
}

pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    // RFC3339 (e.g., "2024-01-02T09:00:00+09:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive ISO without offset, with or without fractional seconds
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    // Bare date
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoticePriority, NoticeStatus};
    use chrono::TimeZone;

    fn notice(id: i64, status: NoticeStatus, priority: NoticePriority, date: &str) -> RawNotice {
        RawNotice {
            id,
            title: format!("notice {id}"),
            content: "본문".to_string(),
            created_date: date.to_string(),
            status,
            priority,
            author: None,
        }
    }

    fn base_item(id: i64, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::Base(id),
            kind: NotificationType::Assignment,
            title: format!("base {id}"),
            message: String::new(),
            created_at,
            read: false,
            link: Some(format!("/courses/{id}")),
            course_id: Some(id),
            course_title: Some("course".to_string()),
        }
    }

    fn flat_ids(feed: &[Notification]) -> Vec<i64> {
        feed.iter().map(|n| n.id.flat()).collect()
    }

    fn scenario_notices() -> Vec<RawNotice> {
        vec![
            notice(1, NoticeStatus::Active, NoticePriority::High, "2024-01-02"),
            notice(2, NoticeStatus::Active, NoticePriority::Low, "2024-01-03"),
        ]
    }

    #[test]
    fn blocking_keeps_only_high_priority() {
        let base = vec![base_item(5, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())];
        let feed = merge(&base, &scenario_notices(), true, Role::Student);
        assert_eq!(flat_ids(&feed), vec![10_001, 5]);
    }

    #[test]
    fn unblocked_keeps_all_active_sorted_newest_first() {
        let feed = merge(&[], &scenario_notices(), false, Role::Student);
        assert_eq!(flat_ids(&feed), vec![10_002, 10_001]);
    }

    #[test]
    fn inactive_notices_never_appear() {
        let notices = vec![
            notice(1, NoticeStatus::Inactive, NoticePriority::High, "2024-01-02"),
            notice(2, NoticeStatus::Other, NoticePriority::High, "2024-01-02"),
        ];
        for policy in [true, false] {
            let feed = merge(&[], &notices, policy, Role::Student);
            assert!(feed.is_empty());
        }
    }

    #[test]
    fn high_priority_active_notices_survive_any_policy() {
        let notices = vec![notice(9, NoticeStatus::Active, NoticePriority::High, "2024-02-01")];
        for policy in [true, false] {
            let feed = merge(&[], &notices, policy, Role::Instructor);
            assert_eq!(feed.len(), 1);
            assert_eq!(feed[0].id, NotificationId::Announcement(9));
        }
    }

    #[test]
    fn medium_priority_is_not_partially_suppressed() {
        let notices = vec![
            notice(1, NoticeStatus::Active, NoticePriority::Medium, "2024-02-01"),
            notice(2, NoticeStatus::Active, NoticePriority::Low, "2024-02-02"),
        ];
        assert!(merge(&[], &notices, true, Role::Student).is_empty());
        assert_eq!(merge(&[], &notices, false, Role::Student).len(), 2);
    }

    #[test]
    fn announcement_fields_are_mapped() {
        let notices = vec![notice(3, NoticeStatus::Active, NoticePriority::Low, "2024-01-02T09:30:00")];
        let feed = merge(&[], &notices, false, Role::Instructor);
        let item = &feed[0];
        assert_eq!(item.kind, NotificationType::Announcement);
        assert_eq!(item.title, "notice 3");
        assert_eq!(item.message, "본문");
        assert_eq!(item.link.as_deref(), Some("/instructor/notifications"));
        assert_eq!(item.course_id, None);
        assert_eq!(item.course_title, None);
        assert!(!item.read);
        assert_eq!(
            item.created_at,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn feed_is_sorted_descending() {
        let base = vec![
            base_item(1, Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()),
            base_item(2, Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()),
        ];
        let feed = merge(&base, &scenario_notices(), false, Role::Student);
        assert_eq!(flat_ids(&feed), vec![2, 10_002, 1, 10_001]);
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let base = vec![base_item(1, at), base_item(2, at)];
        let notices = vec![notice(1, NoticeStatus::Active, NoticePriority::Low, "2024-01-02")];
        let feed = merge(&base, &notices, false, Role::Student);
        assert_eq!(flat_ids(&feed), vec![10_001, 1, 2]);
    }

    #[test]
    fn merging_twice_gives_the_same_feed() {
        let base = vec![base_item(1, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())];
        let first = merge(&base, &scenario_notices(), false, Role::Student);
        let second = merge(&base, &scenario_notices(), false, Role::Student);
        assert_eq!(first, second);
    }

    #[test]
    fn base_ids_above_offset_do_not_collide() {
        let base = vec![base_item(10_001, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())];
        let feed = merge(&base, &scenario_notices(), true, Role::Student);
        assert_eq!(feed.len(), 2);
        assert_ne!(feed[0].id, feed[1].id);
    }

    #[test]
    fn unparsable_date_sorts_last() {
        let notices = vec![
            notice(1, NoticeStatus::Active, NoticePriority::Low, "yesterday"),
            notice(2, NoticeStatus::Active, NoticePriority::Low, "2024-01-03"),
        ];
        let feed = merge(&[], &notices, false, Role::Student);
        assert_eq!(flat_ids(&feed), vec![10_002, 10_001]);
    }

    #[test]
    fn long_content_is_cut_to_100_chars_plus_ellipsis() {
        let content = "a".repeat(150);
        let message = truncate_message(&content);
        assert_eq!(message, format!("{}...", "a".repeat(100)));
    }

    #[test]
    fn content_at_limit_is_untouched() {
        let content = "b".repeat(100);
        assert_eq!(truncate_message(&content), content);
        assert_eq!(truncate_message(""), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let content = "공".repeat(101);
        let message = truncate_message(&content);
        assert_eq!(message.chars().count(), 103);
        assert!(message.starts_with(&"공".repeat(100)));
        assert!(message.ends_with("..."));
    }

    #[test]
    fn parses_supported_date_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2024-01-02"), Some(expected));
        assert_eq!(parse_datetime("2024-01-02T00:00:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-02 00:00:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-02T09:00:00+09:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-02T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_datetime("not a date"), None);
    }
}
