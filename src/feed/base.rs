use chrono::{DateTime, Duration, Utc};

use crate::models::{Notification, NotificationId, NotificationType, Role};

struct Seed {
    id: i64,
    kind: NotificationType,
    title: &'static str,
    message: &'static str,
    age: Duration,
    course: Option<(i64, &'static str)>,
}

fn student_seeds() -> Vec<Seed> {
    vec![
        Seed {
            id: 1,
            kind: NotificationType::Assignment,
            title: "새 과제가 등록되었습니다",
            message: "'자료구조 실습 3' 과제가 등록되었습니다. 마감일을 확인하세요.",
            age: Duration::minutes(30),
            course: Some((101, "자료구조")),
        },
        Seed {
            id: 2,
            kind: NotificationType::Exam,
            title: "시험 일정 안내",
            message: "중간고사가 다음 주 화요일에 진행됩니다.",
            age: Duration::hours(5),
            course: Some((102, "운영체제")),
        },
        Seed {
            id: 3,
            kind: NotificationType::Review,
            title: "과제 피드백이 도착했습니다",
            message: "'알고리즘 과제 2'에 대한 강사 피드백이 등록되었습니다.",
            age: Duration::days(2),
            course: Some((103, "알고리즘")),
        },
    ]
}

fn instructor_seeds() -> Vec<Seed> {
    vec![
        Seed {
            id: 1,
            kind: NotificationType::Question,
            title: "새 질문이 등록되었습니다",
            message: "수강생이 '3주차 강의 자료'에 대해 질문을 남겼습니다.",
            age: Duration::minutes(12),
            course: Some((101, "자료구조")),
        },
        Seed {
            id: 2,
            kind: NotificationType::Review,
            title: "새 수강평이 등록되었습니다",
            message: "강의에 새로운 수강평이 등록되었습니다.",
            age: Duration::days(1),
            course: Some((101, "자료구조")),
        },
    ]
}

/// Role-scoped base notifications. Timestamps are relative to `now`.
pub fn base_notifications(role: Role, now: DateTime<Utc>) -> Vec<Notification> {
    let seeds = match role {
        Role::Student => student_seeds(),
        Role::Instructor => instructor_seeds(),
        Role::Admin => Vec::new(),
    };

    seeds
        .into_iter()
        .map(|seed| Notification {
            id: NotificationId::Base(seed.id),
            kind: seed.kind,
            title: seed.title.to_string(),
            message: seed.message.to_string(),
            created_at: now - seed.age,
            read: false,
            link: seed
                .course
                .map(|(course_id, _)| format!("/courses/{course_id}")),
            course_id: seed.course.map(|(course_id, _)| course_id),
            course_title: seed.course.map(|(_, title)| title.to_string()),
        })
        .collect()
}
