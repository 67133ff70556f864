mod notice;
mod notification;
mod preference;

pub use notice::{NoticePriority, NoticeStatus, RawNotice};
pub use notification::{Notification, NotificationFilter, NotificationId, NotificationType, Role};
pub use preference::Preference;
