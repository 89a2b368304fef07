use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::formatting::format_timestamp;
use super::theme::ThemeColors;
use crate::app::{App, InputMode, SeedsState, SeedsView};

const HUNTER_LOCKED_TITLE: &str = "Niche Hunter is a Pro feature";
const HUNTER_LOCKED_BODY: &str =
    "Track up to 3 keywords of your own and see what they discover in My Niches.";

pub fn render_seeds(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let seeds = &app.seeds;
    let locked = seeds.view == SeedsView::Hunter && !seeds.can_track_niches && !seeds.loading;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, seeds, chunks[0], theme);
    render_input_bar(frame, app, chunks[1], theme);
    if locked {
        render_locked(frame, chunks[2], theme);
    } else {
        render_seed_table(frame, seeds, chunks[2], theme);
    }

    let mut hints = String::from(" a add  d delete");
    if seeds.view == SeedsView::Manager {
        hints.push_str("  p pause/resume");
    }
    hints.push_str("  r refresh  Esc back  ? help  q quit");
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(theme.text_dim)),
        chunks[3],
    );
}

fn render_title(frame: &mut Frame, seeds: &SeedsState, area: Rect, theme: &ThemeColors) {
    let title = match seeds.view {
        SeedsView::Hunter => " NICHE HUNTER ",
        SeedsView::Manager => " SEED MANAGER ",
    };
    let mut spans = vec![
        Span::styled(title, Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        Span::styled("| ", Style::default().fg(theme.border)),
    ];

    match seeds.slot_limit {
        Some(limit) => {
            let color = if seeds.slots_full() { theme.warning } else { theme.success };
            spans.push(Span::styled(
                format!("{} of {} slots used", seeds.slots_used, limit),
                Style::default().fg(color),
            ));
        }
        None => spans.push(Span::styled(
            format!(
                "{} seeds, {} active",
                seeds.seeds.len(),
                seeds.seeds.iter().filter(|s| s.seed.is_active).count()
            ),
            Style::default().fg(theme.text_dim),
        )),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        ),
        area,
    );
}

fn render_input_bar(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let seeds = &app.seeds;
    let label = Style::default().fg(theme.text_dim);
    let category = seeds
        .selected_category()
        .map(|c| c.name.as_str())
        .unwrap_or("none");

    let line = if app.input_mode == InputMode::SeedTerm {
        Line::from(vec![
            Span::styled(" New seed: ", label),
            Span::styled(format!("{}_", seeds.term_input), Style::default().fg(theme.primary)),
            Span::styled("  Category ", label),
            Span::styled(category, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled("  (Tab to change, Enter to add, Esc to cancel)", label),
        ])
    } else {
        Line::from(Span::styled(" Press a to track a new keyword", label))
    };

    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        ),
        area,
    );
}

fn render_locked(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            HUNTER_LOCKED_TITLE,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(HUNTER_LOCKED_BODY, Style::default().fg(theme.text_dim))),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.primary)),
        ),
        area,
    );
}

fn render_seed_table(frame: &mut Frame, seeds: &SeedsState, area: Rect, theme: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Seeds ");

    if seeds.seeds.is_empty() {
        let message = if seeds.loading {
            "Loading seeds..."
        } else {
            "No seeds yet."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(theme.text_dim))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(vec!["Term", "Category", "State", "Trends", "Added"])
        .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = seeds
        .seeds
        .iter()
        .map(|entry| {
            let (state, color) = if entry.seed.is_active {
                ("active", theme.success)
            } else {
                ("paused", theme.text_dim)
            };
            let term_style = if seeds.confirm_delete == Some(entry.seed.id) {
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Cell::from(Span::styled(entry.seed.term.as_str(), term_style)),
                Cell::from(
                    entry
                        .category
                        .as_ref()
                        .map(|c| c.name.as_str())
                        .unwrap_or("-"),
                ),
                Cell::from(Span::styled(state, Style::default().fg(color))),
                Cell::from(entry.trend_count.to_string()),
                Cell::from(format_timestamp(&entry.seed.created_at)),
            ])
            .style(Style::default().fg(theme.text))
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(seeds.selected));
    frame.render_stateful_widget(table, area, &mut state);
}
