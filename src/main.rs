use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod db;
mod error;
mod feed;
mod format;
mod models;
mod state;
mod tui;

#[cfg(test)]
mod test_support;

use app::App;
use config::Config;
use error::{AppError, Result};
use format::{icon_for, time_ago};
use tui::{draw, handle_key_event};

enum Mode {
    Interactive,
    List,
    SetBlockNonCritical(bool),
}

fn parse_args(args: &[String], config: &mut Config) -> Result<Mode> {
    let mut mode = Mode::Interactive;
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--list" => mode = Mode::List,
            "--block-non-critical" => {
                let value = match iter.next().map(String::as_str) {
                    Some("on") => true,
                    Some("off") => false,
                    other => {
                        return Err(AppError::InvalidArgument(format!(
                            "--block-non-critical expects on|off, got {other:?}"
                        )))
                    }
                };
                mode = Mode::SetBlockNonCritical(value);
            }
            "--user" => {
                config.user_id = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| AppError::InvalidArgument("--user expects a numeric id".to_string()))?;
            }
            "--role" => {
                config.role = iter
                    .next()
                    .ok_or_else(|| AppError::InvalidArgument("--role expects a role".to_string()))?
                    .parse()
                    .map_err(AppError::InvalidArgument)?;
            }
            other => {
                return Err(AppError::InvalidArgument(format!("unknown argument {other}")));
            }
        }
    }

    Ok(mode)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = Config::load()?;
    let mode = parse_args(&args, &mut config)?;

    let mut app = App::new(&config).await?;

    match mode {
        Mode::SetBlockNonCritical(value) => {
            app.set_block_non_critical(value).await?;
            println!(
                "Non-critical announcements {} for user {}",
                if value { "blocked" } else { "shown" },
                app.user_id
            );
            return Ok(());
        }
        Mode::List => {
            app.wait_for_announcements().await;
            let now = Utc::now();
            for n in app.state.feed() {
                println!(
                    "{} [{}] {} - {} ({})",
                    icon_for(n.kind),
                    n.id,
                    n.title,
                    n.message,
                    time_ago(n.created_at, now)
                );
            }
            println!("{} unread", app.state.unread_count());
            return Ok(());
        }
        Mode::Interactive => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Merge announcements once the fetch settles
        app.poll_announcements();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.show_help) {
                        if app.handle_action(action).await? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("lms-notices")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_overrides_and_mode() {
        let mut config = Config::default();
        let mode = parse_args(&args(&["--user", "12", "--role", "admin", "--list"]), &mut config).unwrap();
        assert!(matches!(mode, Mode::List));
        assert_eq!(config.user_id, 12);
        assert_eq!(config.role, Role::Admin);
    }

    #[test]
    fn parses_block_toggle() {
        let mut config = Config::default();
        let mode = parse_args(&args(&["--block-non-critical", "on"]), &mut config).unwrap();
        assert!(matches!(mode, Mode::SetBlockNonCritical(true)));
        assert!(parse_args(&args(&["--block-non-critical", "maybe"]), &mut config).is_err());
    }

    #[test]
    fn rejects_unknown_arguments() {
        let mut config = Config::default();
        assert!(parse_args(&args(&["--import", "x"]), &mut config).is_err());
        assert!(parse_args(&args(&["--role", "janitor"]), &mut config).is_err());
    }
}
