//! Heading picker modal.
//!
//! Filters a [`NavigatorSession`] as the user types and turns the chosen
//! row into a [`JumpRequest`].

use crate::navigator::{JumpRequest, NavItem, NavigatorSession};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Outcome of a key press inside the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    /// Keep the picker open.
    Open,
    /// Close without jumping.
    Cancelled,
    /// Close and jump.
    Jump(JumpRequest),
}

/// Picker state: session, query and selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    session: NavigatorSession,
    query: String,
    selected: usize,
}

impl Picker {
    /// Open on `session`, preselecting its current heading.
    pub fn new(session: NavigatorSession) -> Self {
        let selected = session
            .current()
            .and_then(|current| session.items().iter().position(|i| i.index == current))
            .unwrap_or(0);
        Self {
            session,
            query: String::new(),
            selected,
        }
    }

    /// Filter text typed so far.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows matching the query.
    pub fn visible(&self) -> Vec<&NavItem> {
        self.session.filter(&self.query)
    }

    /// Position of the highlighted row within [`visible`](Self::visible).
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                PickerOutcome::Cancelled
            }
            (KeyCode::Enter, _) => self
                .visible()
                .get(self.selected)
                .and_then(|item| self.session.jump_request(item.index))
                .map_or(PickerOutcome::Cancelled, PickerOutcome::Jump),
            (KeyCode::Up, _) | (KeyCode::Char('p'), KeyModifiers::CONTROL) => {
                self.selected = self.selected.saturating_sub(1);
                PickerOutcome::Open
            }
            (KeyCode::Down, _) | (KeyCode::Char('n'), KeyModifiers::CONTROL) => {
                let last = self.visible().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
                PickerOutcome::Open
            }
            (KeyCode::Backspace, _) => {
                self.query.pop();
                self.selected = 0;
                PickerOutcome::Open
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.query.push(c);
                self.selected = 0;
                PickerOutcome::Open
            }
            _ => PickerOutcome::Open,
        }
    }
}

/// Render the picker centred over `area`.
pub fn render_picker(frame: &mut Frame, picker: &Picker) {
    let visible = picker.visible();
    let area = centered_rect(60, visible.len(), frame.area());
    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            let indent = "  ".repeat(usize::from(item.level.get() - 1));
            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::styled(
                    format!("{} ", item.level),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(item.display_text.clone()),
            ]))
        })
        .collect();

    let title = Line::from(Span::styled(
        format!(" Go to heading: {} ", picker.query()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::DarkGray)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default().with_selected(Some(picker.selected()));
    frame.render_stateful_widget(list, area, &mut state);

    let footer_area = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(1),
        width: area.width.saturating_sub(2),
        height: 1,
    };
    let footer = Paragraph::new("↑/↓: Navigate  Enter: Jump  Esc: Cancel")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    frame.render_widget(footer, footer_area);
}

/// Centred rect: `width_cols` wide, tall enough for `rows` plus borders.
fn centered_rect(width_cols: u16, rows: usize, area: Rect) -> Rect {
    let width = width_cols.min(area.width);
    let rows = u16::try_from(rows).unwrap_or(u16::MAX);
    let height = rows
        .saturating_add(3)
        .min(area.height.saturating_sub(2))
        .max(3.min(area.height));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
