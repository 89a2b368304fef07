use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use velocity_types::TrendWithRelations;

use super::formatting::{
    format_forecast, format_growth, format_volume, growth_color, status_color, velocity_color,
};
use super::theme::ThemeColors;
use crate::app::{App, InputMode};

pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let banner_height = if app.dashboard.upgrade_prompt().is_some() || app.dashboard.has_more() {
        4
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(banner_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0], theme);
    render_filter_bar(frame, app, chunks[1], theme);
    render_trend_table(frame, app, chunks[2], theme);
    if banner_height > 0 {
        render_footer_banner(frame, app, chunks[3], theme);
    }
    render_key_hints(frame, app, chunks[4], theme);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let mut spans = vec![
        Span::styled(
            " VELOCITY ",
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme.border)),
    ];

    if let Some(stats) = app.dashboard.stats {
        spans.push(Span::styled(
            format!("{} exploding", stats.exploding_count),
            Style::default().fg(theme.success),
        ));
        spans.push(Span::styled(
            format!("  {} trends  {} categories", stats.total_trends, stats.category_count),
            Style::default().fg(theme.text_dim),
        ));
    }

    let account = if app.account.is_signed_in() {
        let admin = if app.account.is_admin { " admin" } else { "" };
        format!("{} [{}{}] ", app.account.email, app.account.tier.details().name, admin)
    } else {
        "anonymous [Explorer] ".to_string()
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(account.len() as u16 + 2)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), columns[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(account, Style::default().fg(theme.accent)))
            .alignment(Alignment::Right)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            ),
        columns[1],
    );
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let filters = &app.dashboard.filters;
    let label = Style::default().fg(theme.text_dim);
    let value = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" Status ", label),
        Span::styled(filters.status.as_str(), value),
        Span::styled("  Sort ", label),
        Span::styled(filters.sort.as_str(), value),
        Span::styled("  Growth ", label),
        Span::styled(
            match filters.growth.min_growth() {
                Some(min) => format!(">{}%", min),
                None => "all".to_string(),
            },
            value,
        ),
    ];

    if app.dashboard.is_my_niches_view {
        spans.push(Span::styled(
            "  MY NICHES",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    }

    if app.input_mode == InputMode::Typing {
        spans.push(Span::styled("  Search: ", label));
        spans.push(Span::styled(
            format!("{}_", app.dashboard.search_input),
            Style::default().fg(theme.primary),
        ));
    } else if let Some(q) = &filters.search {
        spans.push(Span::styled("  Search ", label));
        spans.push(Span::styled(format!("\"{}\"", q), value));
    } else if !app.account.features.search_enabled {
        spans.push(Span::styled("  Search [Pro]", label));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn trend_row<'a>(item: &'a TrendWithRelations, app: &App, theme: &ThemeColors) -> Row<'a> {
    let trend = &item.trend;

    let velocity = match trend.velocity_score {
        Some(score) => Cell::from(Span::styled(
            format!("{:>3}", score),
            Style::default()
                .fg(velocity_color(score, theme))
                .add_modifier(Modifier::BOLD),
        )),
        None => Cell::from(Span::styled("lock", Style::default().fg(theme.text_dim))),
    };

    let forecast = match trend.forecast_status {
        Some(status) => Cell::from(format_forecast(status, trend.prediction_confidence)),
        None if !app.account.features.forecast_visible => {
            Cell::from(Span::styled("lock", Style::default().fg(theme.text_dim)))
        }
        None => Cell::from("-"),
    };

    Row::new(vec![
        Cell::from(trend.name.as_str()),
        Cell::from(
            item.category
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("-"),
        ),
        Cell::from(Span::styled(
            trend.status.label(),
            Style::default().fg(status_color(trend.status, theme)),
        )),
        Cell::from(Span::styled(
            format_growth(trend.growth_percentage),
            Style::default().fg(growth_color(trend.growth_percentage, theme)),
        )),
        Cell::from(format_volume(trend.current_volume)),
        velocity,
        forecast,
        Cell::from(if trend.is_breakout { "BREAKOUT" } else { "" }),
    ])
    .style(Style::default().fg(theme.text))
}

fn render_trend_table(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let visible = app.dashboard.visible_trends();
    let title = format!(
        " Trends ({} of {}) ",
        visible.len(),
        app.dashboard.trends.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title);

    if app.dashboard.loading && visible.is_empty() {
        frame.render_widget(
            Paragraph::new("Loading trends...")
                .style(Style::default().fg(theme.text_dim))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    if visible.is_empty() {
        let message = if app.dashboard.is_my_niches_view {
            "No trends from your niches yet. Add seeds in the Niche Hunter."
        } else {
            "No trends match these filters."
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

    let header = Row::new(vec![
        "Trend", "Category", "Status", "Growth", "Volume", "Vel", "Forecast", "",
    ])
    .style(Style::default().fg(theme.text_dim).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = visible.iter().map(|t| trend_row(t, app, theme)).collect();
    let widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.dashboard.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer_banner(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let (lines, color) = match app.dashboard.upgrade_prompt() {
        Some((title, message)) => (
            vec![
                Line::from(Span::styled(
                    title,
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(message, Style::default().fg(theme.text_dim))),
            ],
            theme.primary,
        ),
        None => (
            vec![Line::from(Span::styled(
                format!(
                    "Load More ({} more)  [n]",
                    app.dashboard.trends.len() - app.dashboard.visible_trends().len()
                ),
                Style::default().fg(theme.text),
            ))],
            theme.border,
        ),
    };

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}

fn render_key_hints(frame: &mut Frame, app: &App, area: Rect, theme: &ThemeColors) {
    let mut hints = String::from(" Enter details  s status  o sort  g growth  m my niches  / search  r refresh  h hunter");
    if app.account.is_admin {
        hints.push_str("  a seeds  t scrape");
    }
    hints.push_str("  ? help  q quit");

    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(theme.text_dim)),
        area,
    );
}
