use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::ThemeColors;
use crate::app::{App, Screen, Toast, ToastKind};

/// A rectangle `percent_x` by `percent_y` of `area`, centred in it
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn shortcuts_for(app: &App) -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> {
    let mut sections = vec![];

    match app.screen {
        Screen::Dashboard => {
            sections.push((
                "Navigation",
                vec![
                    ("j / Down", "Next trend"),
                    ("k / Up", "Previous trend"),
                    ("Home / End", "First / last trend"),
                    ("Enter", "Open trend details"),
                    ("n / Space", "Load more"),
                ],
            ));
            sections.push((
                "Filters",
                vec![
                    ("s", "Cycle status"),
                    ("o", "Cycle sort order"),
                    ("g", "Cycle growth threshold"),
                    ("m", "Toggle My Niches"),
                    ("/", "Search (Pro)"),
                    ("c", "Clear search"),
                    ("r", "Refresh"),
                ],
            ));
            let mut seeds = vec![("h", "Niche Hunter")];
            if app.account.is_admin {
                seeds.push(("a", "Seed manager"));
            }
            sections.push(("Seeds", seeds));
        }
        Screen::Seeds => {
            let mut items = vec![
                ("j / k", "Select seed"),
                ("a", "Track a new keyword"),
                ("Tab", "Change category while typing"),
                ("d d", "Delete selected seed"),
            ];
            if app.account.is_admin {
                items.push(("p / Space", "Pause or resume seed"));
            }
            items.push(("r", "Refresh"));
            items.push(("Esc", "Back to dashboard"));
            sections.push(("Seeds", items));
        }
        Screen::Detail => {
            sections.push((
                "Trend details",
                vec![
                    ("j / k", "Select related trend"),
                    ("Enter", "Open related trend"),
                    ("Esc", "Back to dashboard"),
                ],
            ));
        }
    }

    let mut general = vec![("?", "Toggle this help"), ("q", "Quit")];
    if app.account.is_admin {
        general.insert(0, ("t", "Trigger scraper"));
    }
    sections.push(("General", general));
    sections
}

pub fn render_help(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let modal_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, modal_area);

    let mut lines = vec![Line::from("")];
    for (section, items) in shortcuts_for(app) {
        lines.push(Line::from(Span::styled(
            section,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<14}", key), Style::default().fg(theme.success)),
                Span::styled(description, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" Keyboard Shortcuts ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(theme.background)),
    );
    frame.render_widget(help, modal_area);
}

/// Toasts sit in the bottom-right corner above the key hints
pub fn render_toast(frame: &mut Frame, toast: &Toast, area: Rect, theme: &ThemeColors) {
    let width = (toast.message.chars().count() as u16 + 4).clamp(20, area.width.saturating_sub(2));
    let height = 3 + (toast.message.chars().count() as u16 + 4) / width.max(1);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 2),
        width,
        height: height.min(area.height),
    };

    let color = match toast.kind {
        ToastKind::Info => theme.primary,
        ToastKind::Success => theme.success,
        ToastKind::Error => theme.error,
    };

    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Paragraph::new(toast.message.as_str())
            .style(Style::default().fg(theme.text))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(theme.background)),
            ),
        toast_area,
    );
}
