//! Session-scoped read state for the merged notification feed.

use std::collections::HashSet;

use crate::models::{Notification, NotificationId};

/// User intent against the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationCommand {
    MarkRead(NotificationId),
    MarkAllRead,
    Navigate(String),
}

pub fn mark_read(feed: &[Notification], id: NotificationId) -> Vec<Notification> {
    feed.iter()
        .map(|n| {
            if n.id == id {
                Notification { read: true, ..n.clone() }
            } else {
                n.clone()
            }
        })
        .collect()
}

pub fn mark_all_read(feed: &[Notification]) -> Vec<Notification> {
    feed.iter()
        .map(|n| Notification { read: true, ..n.clone() })
        .collect()
}

pub fn unread_count(feed: &[Notification]) -> usize {
    feed.iter().filter(|n| !n.read).count()
}

/// Commands for opening a notification: mark it read, then follow its link.
pub fn open_commands(notification: &Notification) -> Vec<NotificationCommand> {
    let mut commands = vec![NotificationCommand::MarkRead(notification.id)];
    if let Some(link) = &notification.link {
        commands.push(NotificationCommand::Navigate(link.clone()));
    }
    commands
}

/// The feed as owned by a rendering surface. Read flags are never persisted.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    feed: Vec<Notification>,
}

impl NotificationState {
    pub fn new(feed: Vec<Notification>) -> Self {
        Self { feed }
    }

    pub fn feed(&self) -> &[Notification] {
        &self.feed
    }

    pub fn unread_count(&self) -> usize {
        unread_count(&self.feed)
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.feed.iter().find(|n| n.id == id)
    }

    /// Install a freshly merged feed, keeping read flags of surviving items.
    pub fn replace_feed(&mut self, feed: Vec<Notification>) {
        let read: HashSet<NotificationId> = self
            .feed
            .iter()
            .filter(|n| n.read)
            .map(|n| n.id)
            .collect();

        self.feed = feed
            .into_iter()
            .map(|n| Notification {
                read: n.read || read.contains(&n.id),
                ..n
            })
            .collect();
    }

    /// Install a feed from scratch, discarding all read flags.
    pub fn reset(&mut self, feed: Vec<Notification>) {
        self.feed = feed;
    }

    /// Apply a command. Returns the route to open for `Navigate`.
    pub fn apply(&mut self, command: NotificationCommand) -> Option<String> {
        match command {
            NotificationCommand::MarkRead(id) => {
                self.feed = mark_read(&self.feed, id);
                None
            }
            NotificationCommand::MarkAllRead => {
                self.feed = mark_all_read(&self.feed);
                None
            }
            NotificationCommand::Navigate(link) => Some(link),
        }
    }
}
