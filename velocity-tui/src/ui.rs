pub mod theme;
mod dashboard;
mod detail;
mod formatting;
mod overlays;
mod seeds;

pub use self::render_main::render;

mod render_main {
    use ratatui::{
        layout::Alignment,
        style::{Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph},
        Frame,
    };

    use super::dashboard::render_dashboard;
    use super::detail::render_detail;
    use super::overlays::{render_help, render_toast};
    use super::seeds::render_seeds;
    use super::theme::theme;
    use crate::app::{App, Screen};

    const MIN_WIDTH: u16 = 70;
    const MIN_HEIGHT: u16 = 20;

    pub fn render(app: &App, frame: &mut Frame) {
        let area = frame.area();
        let theme = theme();

        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background)),
            area,
        );

        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let warning = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Terminal Too Small",
                    Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Minimum size: {}x{}", MIN_WIDTH, MIN_HEIGHT),
                    Style::default().fg(theme.text),
                )),
                Line::from(Span::styled(
                    format!("Current size: {}x{}", area.width, area.height),
                    Style::default().fg(theme.warning),
                )),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.error)),
            );
            frame.render_widget(warning, area);
            return;
        }

        match (app.screen, app.detail.as_ref()) {
            (Screen::Detail, Some(detail)) => render_detail(frame, app, detail, area, &theme),
            (Screen::Seeds, _) => render_seeds(frame, app, area, &theme),
            _ => render_dashboard(frame, app, area, &theme),
        }

        if app.show_help {
            render_help(frame, app, area, &theme);
        }
        if let Some(toast) = &app.toast {
            render_toast(frame, toast, area, &theme);
        }
    }
}
