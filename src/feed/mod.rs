mod base;
mod merge;
mod notices;

pub use base::base_notifications;
pub use merge::merge;
pub use notices::NoticeClient;
