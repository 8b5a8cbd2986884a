//! Terminal host (impure shell)
//!
//! Hosts markdown documents in side-by-side panes and drives the
//! [`Synchronizer`] from terminal events, file watchers and timers.

mod layout;
pub mod picker;
mod status_bar;
pub mod sticky;
mod styles;
pub mod workspace;

pub use layout::{render_layout, split_screen, Screen};
pub use picker::{render_picker, Picker, PickerOutcome};
pub use sticky::{BlockStore, SharedBlockStore, StickyBlock, StickyLine, StickyRenderer};
pub use styles::{ColorConfig, HeadingStyles};
pub use workspace::{Pane, TerminalWorkspace, ANIMATION_DURATION};

use crate::config::{save_config_file, KeyBindings, ResolvedConfig};
use crate::model::{AppError, FileId, KeyAction, ViewId};
use crate::navigator::JumpRequest;
use crate::outline::HeadingTextCache;
use crate::source::{Document, DocumentWatcher, FileChange};
use crate::sync::{SyncOptions, Synchronizer, Workspace};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Poll interval while nothing is scheduled; also how often watchers are drained.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Poll interval while a scroll animation runs.
const FRAME_POLL: Duration = Duration::from_millis(16);

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    sync: Synchronizer<TerminalWorkspace>,
    key_bindings: KeyBindings,
    config: ResolvedConfig,
    /// Where settings changes are saved, `None` to keep them in memory.
    config_path: Option<PathBuf>,
    styles: HeadingStyles,
    picker: Option<Picker>,
    watchers: Vec<DocumentWatcher>,
    /// Files edited on disk, re-indexed on the next loop turn.
    unresolved: Vec<FileId>,
    /// Last laid-out pane areas, for mouse hit testing.
    pane_areas: Vec<(ViewId, Rect)>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Loads every document, starts a watcher per file, then sets up the
    /// terminal in raw mode with alternate screen.
    pub fn new(
        files: &[PathBuf],
        config: ResolvedConfig,
        config_path: Option<PathBuf>,
        styles: HeadingStyles,
    ) -> Result<Self, TuiError> {
        let documents = files
            .iter()
            .map(Document::load)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)?;

        let watchers = files
            .iter()
            .filter_map(|path| match DocumentWatcher::new(path) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    warn!(path = %path.display(), %err, "not watching document");
                    None
                }
            })
            .collect();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let mut app = Self::build(terminal, documents, config, config_path, styles);
        app.watchers = watchers;
        Ok(app)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Sleeps until the next input,
    /// throttle deadline, animation frame or watcher poll.
    pub fn run(&mut self) -> Result<(), TuiError> {
        self.draw()?;

        loop {
            let timeout = self.poll_timeout(Instant::now());
            if event::poll(timeout)? {
                let quit = match event::read()? {
                    Event::Key(key) => self.handle_key(key, Instant::now()),
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse, Instant::now());
                        false
                    }
                    Event::Resize(width, height) => {
                        self.handle_resize(width, height);
                        false
                    }
                    _ => false,
                };
                if quit {
                    self.sync.shutdown();
                    return Ok(());
                }
            }

            self.poll_watchers();
            self.advance(Instant::now());
            self.draw()?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    fn build(
        terminal: Terminal<B>,
        documents: Vec<Document>,
        config: ResolvedConfig,
        config_path: Option<PathBuf>,
        styles: HeadingStyles,
    ) -> Self {
        let store: SharedBlockStore = Rc::new(RefCell::new(BlockStore::new()));
        let workspace = TerminalWorkspace::new(documents, store);
        let options = SyncOptions {
            scroll_window: config.scroll_window(),
            measure_timeout: config.measure_timeout(),
            ..SyncOptions::default()
        };
        let sync = Synchronizer::new(
            workspace,
            config.settings.clone(),
            options,
            HeadingTextCache::new(),
        );

        let mut app = Self {
            terminal,
            sync,
            key_bindings: KeyBindings::default(),
            config,
            config_path,
            styles,
            picker: None,
            watchers: Vec::new(),
            unresolved: Vec::new(),
            pane_areas: Vec::new(),
        };
        app.relayout();
        app.sync.on_layout_change();
        info!(panes = app.pane_areas.len(), "workspace ready");
        app
    }

    /// How long the loop may sleep from `now`.
    fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = IDLE_POLL;
        if self.sync.workspace().is_animating() {
            timeout = timeout.min(FRAME_POLL);
        }
        if let Some(deadline) = self.sync.next_deadline() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout
    }

    /// Recompute pane areas and push viewport heights to the workspace.
    fn relayout(&mut self) {
        let size = self.terminal.size().unwrap_or_default();
        let frame_area = Rect::new(0, 0, size.width.max(1), size.height);
        let workspace = self.sync.workspace_mut();
        let (areas, _) = split_screen(frame_area, workspace.panes().len());
        let ids: Vec<ViewId> = workspace.panes().iter().map(|p| p.id).collect();

        self.pane_areas = ids.into_iter().zip(areas).collect();
        for &(view, area) in &self.pane_areas {
            let height = usize::from(layout::content_area(area).height);
            workspace.set_viewport_height(view, height);
        }
    }

    // ===== Time-driven work =====

    /// Apply measured heights, advance animations and fire due refreshes.
    fn advance(&mut self, now: Instant) {
        self.sync.workspace_mut().set_clock(now);

        let shadows = self.sync.workspace().store().borrow_mut().drain_shadows();
        for (ticket, height) in shadows {
            self.sync.complete_measurement(ticket, height);
        }

        for view in self.sync.workspace_mut().advance_tweens(now) {
            self.sync.on_scroll(view, now);
        }
        self.sync.tick(now);
    }

    /// Re-index files edited last turn, then pick up new edits.
    ///
    /// An edit is observed one turn before its outline is resolved, the
    /// order an editor reports a buffer change and its re-index in.
    fn poll_watchers(&mut self) {
        self.resolve_pending();

        let mut edited = Vec::new();
        for watcher in &mut self.watchers {
            match watcher.poll_changes() {
                FileChange::Unchanged => {}
                FileChange::Modified => edited.push(watcher.path().to_path_buf()),
                FileChange::Deleted => {
                    warn!(path = %watcher.path().display(), "document deleted, keeping last text");
                }
            }
        }

        for path in edited {
            let Ok(file) = FileId::new(path) else {
                continue;
            };
            self.sync.on_editor_change(&file);
            if let Some(document) = self.sync.workspace_mut().document_mut(&file) {
                if let Err(err) = document.reload() {
                    warn!(%file, %err, "reload failed");
                    continue;
                }
            }
            debug!(%file, "document changed on disk");
            self.unresolved.push(file);
        }
    }

    fn resolve_pending(&mut self) {
        for file in std::mem::take(&mut self.unresolved) {
            if let Some(document) = self.sync.workspace_mut().document_mut(&file) {
                document.reindex();
            }
            self.sync.on_resolve(&file);
        }
    }

    // ===== Input =====

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if let Some(picker) = self.picker.as_mut() {
            match picker.handle_key(key) {
                PickerOutcome::Open => {}
                PickerOutcome::Cancelled => self.picker = None,
                PickerOutcome::Jump(request) => {
                    self.picker = None;
                    self.jump(request, now);
                }
            }
            return false;
        }

        // Ctrl+C always quits, even if rebound
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        match action {
            KeyAction::Quit => return true,
            action if action.is_scroll() => self.handle_scroll_action(action, now),
            action if action.is_setting() => self.handle_setting_action(action),
            KeyAction::NextView => {
                self.sync.workspace_mut().focus_next();
                self.sync.on_active_view_change();
            }
            KeyAction::SplitView => {
                if self.sync.workspace_mut().split_active().is_some() {
                    self.relayout();
                    self.sync.on_layout_change();
                }
            }
            KeyAction::CloseView => {
                if self.sync.workspace_mut().close_active().is_some() {
                    self.relayout();
                    self.sync.on_layout_change();
                }
            }
            KeyAction::CycleEditMode => {
                self.sync.workspace_mut().cycle_edit_mode();
                self.sync.on_layout_change();
            }
            KeyAction::OpenNavigator => {
                self.picker = self.sync.open_navigator().map(Picker::new);
            }
            KeyAction::JumpToCurrent => {
                let request = self.sync.workspace().active_view().and_then(|view| {
                    self.sync.current_heading(view).map(|heading| JumpRequest {
                        view,
                        index: heading.index,
                    })
                });
                if let Some(request) = request {
                    self.jump(request, now);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_scroll_action(&mut self, action: KeyAction, now: Instant) {
        let Some(pane) = self.sync.workspace().active_pane() else {
            return;
        };
        let view = pane.id;
        let page = isize::try_from(pane.viewport_height.max(1)).unwrap_or(isize::MAX);

        let workspace = self.sync.workspace_mut();
        match action {
            KeyAction::ScrollUp => workspace.scroll_by(view, -1),
            KeyAction::ScrollDown => workspace.scroll_by(view, 1),
            KeyAction::PageUp => workspace.scroll_by(view, -page),
            KeyAction::PageDown => workspace.scroll_by(view, page),
            KeyAction::ScrollToTop => workspace.scroll_to_edge(view, false),
            KeyAction::ScrollToBottom => workspace.scroll_to_edge(view, true),
            _ => return,
        }
        self.sync.on_scroll(view, now);
    }

    fn handle_setting_action(&mut self, action: KeyAction) {
        let Some(settings) = self.sync.settings().with_action(action) else {
            return;
        };
        self.config.settings = settings.clone();
        self.sync.on_settings_changed(settings);

        if let Some(path) = &self.config_path {
            if let Err(err) = save_config_file(path, &self.config) {
                warn!(%err, "settings not saved");
            }
        }
    }

    /// Start a jump and apply its measurement right away.
    fn jump(&mut self, request: JumpRequest, now: Instant) {
        if self.sync.begin_jump(request, now).is_some() {
            self.advance(now);
        }
    }

    /// Handle a single mouse event
    ///
    /// Wheel scrolls the pane under the cursor; a click focuses the pane
    /// and, on a sticky row, jumps to that heading.
    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let Some((view, area)) = self.pane_at(mouse.column, mouse.row) else {
            return;
        };

        match mouse.kind {
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                let delta = if mouse.kind == MouseEventKind::ScrollDown {
                    WHEEL_STEP
                } else {
                    -WHEEL_STEP
                };
                self.sync.workspace_mut().scroll_by(view, delta);
                self.sync.on_scroll(view, now);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.sync.workspace().active_view() != Some(view) {
                    self.sync.workspace_mut().focus(view);
                    self.sync.on_active_view_change();
                }

                let content = layout::content_area(area);
                let Some(row) = mouse.row.checked_sub(content.y) else {
                    return;
                };
                let request = {
                    let store = self.sync.workspace().store().borrow();
                    store
                        .block(view)
                        .and_then(|block| block.line_at_row(usize::from(row)))
                        .map(|line| JumpRequest {
                            view,
                            index: line.index,
                        })
                };
                if let Some(request) = request {
                    debug!(%view, index = request.index, "sticky heading clicked");
                    self.jump(request, now);
                }
            }
            _ => {}
        }
    }

    fn pane_at(&self, column: u16, row: u16) -> Option<(ViewId, Rect)> {
        self.pane_areas
            .iter()
            .copied()
            .find(|(_, area)| area.contains(ratatui::layout::Position::new(column, row)))
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        debug!("Handling resize to {}x{}", width, height);
        self.relayout();
        let views: Vec<ViewId> = self.pane_areas.iter().map(|(view, _)| *view).collect();
        for view in views {
            self.sync.on_resize(view);
        }
    }

    /// Render the current frame
    fn draw(&mut self) -> Result<(), TuiError> {
        let screen = Screen {
            workspace: self.sync.workspace(),
            status: self.sync.status(),
            settings: self.sync.settings(),
            picker: self.picker.as_ref(),
            styles: &self.styles,
        };
        self.terminal.draw(|frame| render_layout(frame, &screen))?;
        Ok(())
    }
}

// ===== Test Helpers =====

#[cfg(test)]
#[allow(dead_code)] // Not every helper is used by every test module
impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Create TuiApp for testing (test-only constructor)
    ///
    /// No terminal setup, no watchers, settings kept in memory.
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        documents: Vec<Document>,
        config: ResolvedConfig,
    ) -> Self {
        Self::build(
            terminal,
            documents,
            config,
            None,
            HeadingStyles::new(ColorConfig::enabled()),
        )
    }

    pub(crate) fn sync(&self) -> &Synchronizer<TerminalWorkspace> {
        &self.sync
    }

    pub(crate) fn picker(&self) -> Option<&Picker> {
        self.picker.as_ref()
    }

    pub(crate) fn handle_key_test(&mut self, key: KeyEvent, now: Instant) -> bool {
        self.handle_key(key, now)
    }

    pub(crate) fn handle_mouse_test(&mut self, mouse: MouseEvent, now: Instant) {
        self.handle_mouse(mouse, now)
    }

    pub(crate) fn handle_resize_test(&mut self, width: u16, height: u16) {
        self.handle_resize(width, height)
    }

    pub(crate) fn advance_test(&mut self, now: Instant) {
        self.advance(now)
    }

    /// Simulate an on-disk edit observed by a watcher.
    pub(crate) fn edit_document_test(&mut self, file: &FileId, text: &str) {
        self.sync.on_editor_change(file);
        if let Some(document) = self.sync.workspace_mut().document_mut(file) {
            document.replace_text(text);
        }
        self.unresolved.push(file.clone());
    }

    pub(crate) fn poll_watchers_test(&mut self) {
        self.poll_watchers()
    }

    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

/// Initialize and run the terminal host
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(
    files: &[PathBuf],
    config: ResolvedConfig,
    config_path: Option<PathBuf>,
    no_color: bool,
) -> Result<(), TuiError> {
    let styles = HeadingStyles::new(ColorConfig::from_env_and_args(no_color));
    let mut app = TuiApp::new(files, config, config_path, styles)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
