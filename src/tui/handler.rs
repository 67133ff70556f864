use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    OpenSelected,
    MarkRead,
    MarkAllRead,
    ToggleBlockNonCritical,
    CycleFilter,
    Refresh,
    ShowHelp,
    HideHelp,
}

pub fn handle_key_event(key: KeyEvent, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(AppAction::MoveToBottom),

        (KeyCode::Enter, _) => Some(AppAction::OpenSelected),

        (KeyCode::Char('m'), KeyModifiers::NONE) => Some(AppAction::MarkRead),
        (KeyCode::Char('M'), _) => Some(AppAction::MarkAllRead),
        (KeyCode::Char('b'), _) => Some(AppAction::ToggleBlockNonCritical),
        (KeyCode::Char('f'), _) | (KeyCode::Tab, _) => Some(AppAction::CycleFilter),
        (KeyCode::Char('r'), _) => Some(AppAction::Refresh),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}
