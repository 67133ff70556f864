use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::format::{icon_for, label_for, time_ago};
use crate::models::Notification;

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: list on the left, detail on the right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Notification list
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Notification title
            Constraint::Min(0),    // Message
            Constraint::Length(1), // Preference status
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_notification_list(frame, app, left_chunks[1]);
    render_left_status(frame, app, left_chunks[2]);

    render_notification_title(frame, app, right_chunks[0]);
    render_detail(frame, app, right_chunks[1]);
    render_right_status(frame, app, right_chunks[2]);

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" 알림 [{}] ", app.filter.label());
    let stats = format!(
        " {} | 전체 {} | 읽지 않음 {}",
        app.role.label(),
        app.state.feed().len(),
        app.state.unread_count()
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_notification_list(frame: &mut Frame, app: &App, area: Rect) {
    let now = Utc::now();
    let notifications = app.filtered_notifications();

    if notifications.is_empty() {
        let empty = if app.is_loading {
            "알림을 불러오는 중..."
        } else {
            "새로운 알림이 없습니다"
        };
        let paragraph = Paragraph::new(empty)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = notifications
        .iter()
        .map(|notification| {
            let style = if notification.read {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            };

            let marker = if notification.read { "  " } else { "● " };

            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Blue)),
                Span::raw(format!("{} ", icon_for(notification.kind))),
                Span::styled(notification.title.as_str(), style),
                Span::styled(
                    format!("  {}", time_ago(notification.created_at, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_left_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.is_loading {
        "시스템 공지를 불러오는 중..."
    } else {
        "j/k:이동  enter:열기  m:읽음  M:모두 읽음  ?:도움말  q:종료"
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_notification_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = app
        .selected_notification()
        .map(|n| n.title.as_str())
        .unwrap_or("선택된 알림이 없습니다");

    let block = Block::default()
        .title(" 알림 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(title)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn detail_lines(notification: &Notification, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", icon_for(notification.kind))),
        Span::styled(
            label_for(notification.kind),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("  {}", time_ago(notification.created_at, Utc::now())),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    if let Some(course) = &notification.course_title {
        lines.push(Line::styled(
            format!("강의: {course}"),
            Style::default().fg(Color::Blue),
        ));
    }

    lines.push(Line::raw(""));
    lines.extend(
        textwrap::wrap(&notification.message, width.max(1))
            .into_iter()
            .map(|line| Line::raw(line.into_owned())),
    );

    if let Some(link) = &notification.link {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("→ {link}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 내용 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let width = block.inner(area).width as usize;
    let lines = app
        .selected_notification()
        .map(|n| detail_lines(n, width))
        .unwrap_or_default();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_right_status(frame: &mut Frame, app: &App, area: Rect) {
    let policy = if app.block_non_critical {
        "시스템 공지: 중요 공지만"
    } else {
        "시스템 공지: 모두 표시"
    };

    let text = format!("{policy} | b:전환");
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = [
        "",
        " 이동:",
        "   j / ↓    아래로",
        "   k / ↑    위로",
        "   g / G    처음 / 끝",
        "",
        " 알림:",
        "   Enter    읽음 처리 후 링크 열기",
        "   m        읽음 처리",
        "   M        모두 읽음 처리",
        "   f        필터 전환 (전체 / 읽지 않음)",
        "   b        중요하지 않은 시스템 공지 차단 전환",
        "   r        새로고침",
        "",
        " 기타:",
        "   ?        도움말",
        "   q        종료",
        "",
        " 아무 키나 누르면 닫힙니다",
    ];

    let block = Block::default()
        .title(" 도움말 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
