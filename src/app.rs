use chrono::Utc;
use tokio::sync::mpsc;
use url::Url;

use crate::config::Config;
use crate::db::PreferenceStore;
use crate::error::Result;
use crate::feed::{base_notifications, merge, NoticeClient};
use crate::models::{Notification, NotificationFilter, RawNotice, Role};
use crate::state::{open_commands, NotificationCommand, NotificationState};
use crate::tui::AppAction;

// Message for a settled announcement fetch
pub struct AnnouncementResult {
    pub generation: u64,
    pub notices: Vec<RawNotice>,
}

pub struct App {
    // Data
    pub state: NotificationState,
    pub user_id: i64,
    pub role: Role,
    pub block_non_critical: bool,
    base: Vec<Notification>,
    announcements: Vec<RawNotice>,

    // UI State
    pub selected_index: usize,
    pub filter: NotificationFilter,
    pub show_help: bool,

    // Async state
    pub is_loading: bool,
    generation: u64,
    announcement_rx: mpsc::Receiver<AnnouncementResult>,
    announcement_tx: mpsc::Sender<AnnouncementResult>,

    // Services
    preferences: PreferenceStore,
    notices: NoticeClient,
    web_base_url: Url,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let preferences = PreferenceStore::open(&config.db_path).await?;
        let notices = NoticeClient::new(config)?;
        let web_base_url = Url::parse(&config.web_base_url)?;

        let preference = preferences.load(config.user_id).await;
        tracing::debug!(
            "Loading notices from {} for user {} (block non-critical: {})",
            notices.endpoint(),
            preference.user_id,
            preference.block_non_critical
        );
        let (announcement_tx, announcement_rx) = mpsc::channel(4);

        let mut app = Self {
            state: NotificationState::default(),
            user_id: config.user_id,
            role: config.role,
            block_non_critical: preference.block_non_critical,
            base: Vec::new(),
            announcements: Vec::new(),
            selected_index: 0,
            filter: NotificationFilter::default(),
            show_help: false,
            is_loading: false,
            generation: 0,
            announcement_rx,
            announcement_tx,
            preferences,
            notices,
            web_base_url,
        };

        app.refresh();
        Ok(app)
    }

    pub fn filtered_notifications(&self) -> Vec<&Notification> {
        self.state
            .feed()
            .iter()
            .filter(|n| self.filter.matches(n))
            .collect()
    }

    pub fn selected_notification(&self) -> Option<&Notification> {
        let notifications = self.filtered_notifications();
        notifications.get(self.selected_index).copied()
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.filtered_notifications().len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::MoveToTop => {
                self.selected_index = 0;
            }

            AppAction::MoveToBottom => {
                self.selected_index = self.filtered_notifications().len().saturating_sub(1);
            }

            AppAction::OpenSelected => {
                if let Some(url) = self.open_selected() {
                    if let Err(e) = open::that(url.as_str()) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                }
            }

            AppAction::MarkRead => {
                if let Some(notification) = self.selected_notification() {
                    let id = notification.id;
                    self.dispatch(NotificationCommand::MarkRead(id));
                }
            }

            AppAction::MarkAllRead => {
                self.dispatch(NotificationCommand::MarkAllRead);
            }

            AppAction::ToggleBlockNonCritical => {
                // The policy still applies for this session when the write fails
                if let Err(e) = self.set_block_non_critical(!self.block_non_critical).await {
                    tracing::warn!(
                        "Failed to store announcement policy for user {}: {}",
                        self.user_id,
                        e
                    );
                }
            }

            AppAction::CycleFilter => {
                self.filter = self.filter.cycle();
                self.selected_index = 0;
            }

            AppAction::Refresh => {
                self.refresh();
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        Ok(false)
    }

    /// Apply a command to the feed. Returns the resolved URL for `Navigate`.
    pub fn dispatch(&mut self, command: NotificationCommand) -> Option<Url> {
        let route = self.state.apply(command);
        self.clamp_selection();
        route.and_then(|route| self.resolve_link(&route))
    }

    /// Mark the selected notification read and resolve its link, in that order.
    pub fn open_selected(&mut self) -> Option<Url> {
        let commands = self.selected_notification().map(open_commands)?;

        let mut url = None;
        for command in commands {
            if let Some(resolved) = self.dispatch(command) {
                url = Some(resolved);
            }
        }
        url
    }

    fn resolve_link(&self, link: &str) -> Option<Url> {
        match self.web_base_url.join(link) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Invalid notification link {:?}: {}", link, e);
                None
            }
        }
    }

    /// Re-run the merge in place under the new policy, then persist it.
    pub async fn set_block_non_critical(&mut self, block_non_critical: bool) -> Result<()> {
        self.block_non_critical = block_non_critical;
        self.remerge();
        self.preferences.set(self.user_id, block_non_critical).await
    }

    /// Rebuild the feed from scratch: base items now, announcements once
    /// the fetch settles. Read flags are discarded.
    pub fn refresh(&mut self) {
        self.base = base_notifications(self.role, Utc::now());
        self.announcements.clear();
        self.state
            .reset(merge(&self.base, &[], self.block_non_critical, self.role));
        self.clamp_selection();
        self.start_announcement_fetch();
    }

    fn start_announcement_fetch(&mut self) {
        self.generation += 1;
        self.is_loading = true;

        let generation = self.generation;
        let notices = self.notices.clone();
        let tx = self.announcement_tx.clone();

        tokio::spawn(async move {
            let notices = notices.collect().await;
            let _ = tx.send(AnnouncementResult { generation, notices }).await;
        });
    }

    /// Poll for a settled announcement fetch (non-blocking)
    pub fn poll_announcements(&mut self) {
        while let Ok(result) = self.announcement_rx.try_recv() {
            self.apply_announcements(result);
        }
    }

    /// Wait until the current announcement fetch settles.
    pub async fn wait_for_announcements(&mut self) {
        while self.is_loading {
            match self.announcement_rx.recv().await {
                Some(result) => self.apply_announcements(result),
                None => break,
            }
        }
    }

    pub fn apply_announcements(&mut self, result: AnnouncementResult) {
        if result.generation != self.generation {
            tracing::debug!(
                "Dropping stale announcements from load {} (current {})",
                result.generation,
                self.generation
            );
            return;
        }

        self.announcements = result.notices;
        self.is_loading = false;
        self.remerge();
    }

    fn remerge(&mut self) {
        let feed = merge(
            &self.base,
            &self.announcements,
            self.block_non_critical,
            self.role,
        );
        self.state.replace_feed(feed);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_notifications().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}
