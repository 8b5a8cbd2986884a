//! Bottom status line: current section, settings summary and key hints.

use crate::model::{DisplayMode, ScrollBehaviour, Settings};
use crate::navigator::StatusIndicator;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const HINTS: &str = "o: headings | v/x: split/close | q: quit";

/// Compact description of the settings, e.g. `default max:∞ animated`.
pub fn settings_summary(settings: &Settings) -> String {
    let mode = match settings.mode {
        DisplayMode::Default => "default",
        DisplayMode::Concise => "concise",
    };
    let max = if settings.max == 0 {
        "∞".to_string()
    } else {
        settings.max.to_string()
    };
    let scroll = match settings.scroll_behaviour {
        ScrollBehaviour::Instant => "instant",
        ScrollBehaviour::Animated => "animated",
    };
    format!("{mode} max:{max} {scroll}")
}

/// Build the status line.
pub fn status_line(status: &StatusIndicator, settings: &Settings) -> Line<'static> {
    let mut spans = Vec::new();
    if let Some(label) = status.label() {
        spans.push(Span::styled(
            format!(" {label} "),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        format!("[{}]", settings_summary(settings)),
        Style::default().fg(Color::Yellow),
    ));
    spans.push(Span::styled(
        format!(" {HINTS}"),
        Style::default().fg(Color::Gray),
    ));
    Line::from(spans)
}

/// Draw the status bar row.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status: &StatusIndicator,
    settings: &Settings,
) {
    frame.render_widget(Paragraph::new(status_line(status, settings)), area);
}
