use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Sparkline},
    Frame,
};

use super::formatting::{
    format_forecast, format_growth, format_timestamp, format_volume, growth_color, status_color,
    velocity_color, wrap_text,
};
use super::theme::ThemeColors;
use crate::app::{App, DetailState};

const FORECAST_LOCKED_MESSAGE: &str = "Forecasts unlock on the Pro plan";

pub fn render_detail(
    frame: &mut Frame,
    app: &App,
    detail: &DetailState,
    area: Rect,
    theme: &ThemeColors,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, detail, chunks[0], theme);
    render_metrics(frame, detail, chunks[1], theme);
    render_history(frame, detail, chunks[2], theme);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[3]);
    render_description(frame, detail, lower[0], theme);
    render_related(frame, detail, lower[1], theme);

    let mut hints = String::from(" Esc back  j/k related  Enter open related");
    if app.account.is_admin {
        hints.push_str("  t scrape");
    }
    hints.push_str("  ? help  q quit");
    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(theme.text_dim)),
        chunks[4],
    );
}

fn bordered<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title)
}

fn render_title(frame: &mut Frame, detail: &DetailState, area: Rect, theme: &ThemeColors) {
    let item = detail.trend();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", item.trend.name),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            item.trend.status.label(),
            Style::default().fg(status_color(item.trend.status, theme)),
        ),
    ];
    if let Some(category) = &item.category {
        spans.push(Span::styled(
            format!("  {}", category.name),
            Style::default().fg(theme.text_dim),
        ));
    }
    if item.trend.is_breakout {
        spans.push(Span::styled(
            "  BREAKOUT",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(bordered("", theme)),
        area,
    );
}

fn render_metrics(frame: &mut Frame, detail: &DetailState, area: Rect, theme: &ThemeColors) {
    let trend = &detail.trend().trend;
    let label = Style::default().fg(theme.text_dim);

    let velocity = match trend.velocity_score {
        Some(score) => Span::styled(
            format!("{}/100", score),
            Style::default()
                .fg(velocity_color(score, theme))
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("locked", label),
    };

    let forecast = if detail.response.forecast_locked {
        Span::styled(FORECAST_LOCKED_MESSAGE, Style::default().fg(theme.primary))
    } else {
        match trend.forecast_status {
            Some(status) => Span::styled(
                format_forecast(status, trend.prediction_confidence),
                Style::default().fg(theme.text),
            ),
            None => Span::styled("-", label),
        }
    };

    let updated = trend
        .last_fetched_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "never".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled(" Monthly searches  ", label),
            Span::styled(
                format_volume(trend.current_volume),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Growth            ", label),
            Span::styled(
                format_growth(trend.growth_percentage),
                Style::default().fg(growth_color(trend.growth_percentage, theme)),
            ),
        ]),
        Line::from(vec![Span::styled(" Velocity          ", label), velocity]),
        Line::from(vec![Span::styled(" Forecast          ", label), forecast]),
        Line::from(vec![
            Span::styled(" Last updated      ", label),
            Span::styled(updated, Style::default().fg(theme.text)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(bordered(" Metrics ", theme)), area);
}

fn render_history(frame: &mut Frame, detail: &DetailState, area: Rect, theme: &ThemeColors) {
    let series = detail.volume_series();
    let title = match (detail.trend().metrics.first(), detail.trend().metrics.last()) {
        (Some(first), Some(last)) => format!(" Search volume {} to {} ", first.date, last.date),
        _ => " Search volume ".to_string(),
    };

    if series.is_empty() {
        frame.render_widget(
            Paragraph::new("No history yet")
                .style(Style::default().fg(theme.text_dim))
                .block(bordered(&title, theme)),
            area,
        );
        return;
    }

    let sparkline = Sparkline::default()
        .block(bordered(&title, theme))
        .data(&series)
        .style(Style::default().fg(theme.primary));
    frame.render_widget(sparkline, area);
}

fn render_description(frame: &mut Frame, detail: &DetailState, area: Rect, theme: &ThemeColors) {
    let item = detail.trend();
    let width = area.width.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = item
        .trend
        .description
        .as_deref()
        .map(|d| wrap_text(d, width))
        .unwrap_or_default()
        .into_iter()
        .map(|l| Line::from(Span::styled(format!(" {}", l), Style::default().fg(theme.text))))
        .collect();

    if !item.trend.top_regions.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Top regions  ", Style::default().fg(theme.text_dim)),
            Span::styled(item.trend.top_regions.join(", "), Style::default().fg(theme.text)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(bordered(" About ", theme)), area);
}

fn render_related(frame: &mut Frame, detail: &DetailState, area: Rect, theme: &ThemeColors) {
    let items: Vec<ListItem> = detail
        .response
        .related
        .iter()
        .map(|related| {
            ListItem::new(Line::from(vec![
                Span::styled(related.trend.name.as_str(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  {}", format_growth(related.trend.growth_percentage)),
                    Style::default().fg(growth_color(related.trend.growth_percentage, theme)),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(" Nothing related in this category")
                .style(Style::default().fg(theme.text_dim))
                .block(bordered(" Related ", theme)),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(bordered(" Related ", theme))
        .highlight_style(Style::default().bg(theme.highlight_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(detail.selected_related));
    frame.render_stateful_widget(list, area, &mut state);
}
