//! Screen layout: side-by-side panes above a one-line status bar.
//!
//! Pure rendering from a [`Screen`] snapshot. Each pane draws its visible
//! virtual rows, then its sticky block over the top of the content.

use crate::model::Settings;
use crate::navigator::StatusIndicator;
use crate::view::picker::{render_picker, Picker};
use crate::view::status_bar::render_status_bar;
use crate::view::sticky::render_block;
use crate::view::styles::HeadingStyles;
use crate::view::workspace::{Pane, TerminalWorkspace};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::HashSet;

/// Everything the draw pass reads.
pub struct Screen<'a> {
    /// Panes and documents.
    pub workspace: &'a TerminalWorkspace,
    /// Status bar indicator.
    pub status: &'a StatusIndicator,
    /// Settings in effect.
    pub settings: &'a Settings,
    /// Open heading picker.
    pub picker: Option<&'a Picker>,
    /// Heading styles.
    pub styles: &'a HeadingStyles,
}

/// Split `area` into pane areas and the status bar row.
pub fn split_screen(area: Rect, panes: usize) -> (Vec<Rect>, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let count = u32::try_from(panes.max(1)).unwrap_or(u32::MAX);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(rows[0]);
    (columns.iter().copied().take(panes).collect(), rows[1])
}

/// Content area of a pane inside its border.
pub fn content_area(pane_area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(pane_area)
}

/// Draw panes, sticky blocks, status bar and picker.
pub fn render_layout(frame: &mut Frame, screen: &Screen<'_>) {
    let panes = screen.workspace.panes();
    let (areas, status_area) = split_screen(frame.area(), panes.len());
    let active = screen.workspace.active_pane().map(|p| p.id);

    for (pane, area) in panes.iter().zip(areas) {
        render_pane(frame, area, pane, Some(pane.id) == active, screen);
    }

    render_status_bar(frame, status_area, screen.status, screen.settings);

    if let Some(picker) = screen.picker {
        render_picker(frame, picker);
    }
}

fn render_pane(frame: &mut Frame, area: Rect, pane: &Pane, focused: bool, screen: &Screen<'_>) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Block::default().borders(Borders::ALL).border_style(border), area);

    let inner = content_area(area);
    let Some(document) = screen.workspace.document(&pane.file) else {
        return;
    };
    let heading_lines: HashSet<usize> = document.outline().iter().map(|i| i.offset).collect();
    let heading_style = Style::default().add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = (pane.scroll_top..pane.scroll_top + usize::from(inner.height))
        .map(|row| match row.checked_sub(pane.padding) {
            Some(line_no) => match document.lines().get(line_no) {
                Some(text) if heading_lines.contains(&line_no) => {
                    Line::styled(text.clone(), heading_style)
                }
                Some(text) => Line::raw(text.clone()),
                None => Line::raw(""),
            },
            None => Line::raw(""),
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    let store = screen.workspace.store().borrow();
    if let Some(block) = store.block(pane.id) {
        render_block(frame, inner, block, screen.styles);
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
