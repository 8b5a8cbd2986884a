//! Acceptance Test Harness for TUI testing
//!
//! Wraps TuiApp<TestBackend> with a simulated clock so tests read as a
//! sequence of user interactions.

use crate::config::ResolvedConfig;
use crate::model::{FileId, Settings, ViewId};
use crate::source::Document;
use crate::view::{Pane, TuiApp};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::time::{Duration, Instant};

/// Gap between simulated inputs, wider than the default scroll throttle window.
const INPUT_GAP: Duration = Duration::from_millis(60);

/// Convert a ratatui buffer to a string representation for snapshot testing.
///
/// Captures the visual output character by character, preserving layout.
/// Empty lines are removed to keep snapshots clean.
pub(crate) fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Test harness for acceptance testing
pub(crate) struct AcceptanceTestHarness {
    app: TuiApp<TestBackend>,
    now: Instant,
}

#[allow(dead_code)] // Not every helper is used by every acceptance test
impl AcceptanceTestHarness {
    /// One document per `(file name, text)` pair, one pane each.
    pub(crate) fn with_documents(
        documents: &[(&str, &str)],
        settings: Settings,
        width: u16,
        height: u16,
    ) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height)).expect("test terminal");
        let documents = documents
            .iter()
            .map(|(name, text)| Document::from_text(FileId::new(*name).expect("file name"), text))
            .collect();
        let config = ResolvedConfig {
            settings,
            ..ResolvedConfig::default()
        };
        Self {
            app: TuiApp::new_for_test(terminal, documents, config),
            now: Instant::now(),
        }
    }

    /// Single document with default settings in an 80x24 terminal.
    pub(crate) fn with_markdown(name: &str, text: &str) -> Self {
        Self::with_documents(&[(name, text)], Settings::default(), 80, 24)
    }

    fn tick(&mut self) -> Instant {
        self.now += INPUT_GAP;
        self.now
    }

    /// Press a plain character key. Returns true if the app quit.
    pub(crate) fn press(&mut self, c: char) -> bool {
        self.press_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    pub(crate) fn press_code(&mut self, code: KeyCode) -> bool {
        self.press_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    pub(crate) fn press_key(&mut self, key: KeyEvent) -> bool {
        let now = self.tick();
        let quit = self.app.handle_key_test(key, now);
        self.app.advance_test(now);
        quit
    }

    /// Type `text` character by character.
    pub(crate) fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(c);
        }
    }

    pub(crate) fn click(&mut self, column: u16, row: u16) {
        self.mouse(MouseEventKind::Down(MouseButton::Left), column, row);
    }

    pub(crate) fn wheel_down(&mut self, column: u16, row: u16) {
        self.mouse(MouseEventKind::ScrollDown, column, row);
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        let now = self.tick();
        self.app.handle_mouse_test(
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
            now,
        );
        self.app.advance_test(now);
    }

    /// Let simulated time pass.
    pub(crate) fn wait(&mut self, duration: Duration) {
        self.now += duration;
        self.app.advance_test(self.now);
    }

    pub(crate) fn app(&self) -> &TuiApp<TestBackend> {
        &self.app
    }

    pub(crate) fn pane(&self, view: u64) -> &Pane {
        self.app
            .sync()
            .workspace()
            .pane(ViewId::new(view))
            .expect("pane")
    }

    /// Display text of the pinned headings of `view`, top to bottom.
    pub(crate) fn pinned(&self, view: u64) -> Vec<String> {
        self.app
            .sync()
            .workspace()
            .store()
            .borrow()
            .block(ViewId::new(view))
            .map(|block| block.lines.iter().map(|l| l.text.clone()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn status_label(&self) -> Option<String> {
        self.app.sync().status().label()
    }

    pub(crate) fn render_to_string(&mut self) -> String {
        self.app.render_test().expect("render");
        buffer_to_string(self.app.terminal().backend().buffer())
    }
}
