//! Terminal workspace: documents and panes behind the synchroniser.
//!
//! Pane content is addressed in virtual rows: `padding` blank rows reserved
//! for the sticky block, then one row per document line. Heading offsets and
//! scroll positions both use virtual rows, so a heading on line `l` has
//! offset `l + padding`.

use crate::model::{EditMode, FileId, OutlineItem, ScrollBehaviour, ViewId};
use crate::navigator::{Easing, ScrollTween};
use crate::outline::DisplayTextRenderer;
use crate::source::Document;
use crate::sync::{HeadingRenderer, OpenView, ScrollMetrics, Workspace};
use crate::view::sticky::{SharedBlockStore, StickyRenderer};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Length of an animated jump.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(250);

// ===== Pane =====

/// One open view of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    /// Pane identity.
    pub id: ViewId,
    /// File shown.
    pub file: FileId,
    /// First visible row, padding included.
    pub scroll_top: usize,
    /// Rows reserved above the document for the sticky block.
    pub padding: usize,
    /// Content rows visible.
    pub viewport_height: usize,
    /// Source or rendered display.
    pub edit_mode: EditMode,
    /// Animated scroll in progress.
    pub tween: Option<ScrollTween>,
}

impl Pane {
    fn new(id: ViewId, file: FileId) -> Self {
        Self {
            id,
            file,
            scroll_top: 0,
            padding: 0,
            viewport_height: 0,
            edit_mode: EditMode::default(),
            tween: None,
        }
    }
}

// ===== TerminalWorkspace =====

/// Documents and panes of the terminal host.
#[derive(Debug)]
pub struct TerminalWorkspace {
    documents: BTreeMap<FileId, Document>,
    panes: Vec<Pane>,
    active: usize,
    next_id: u64,
    store: SharedBlockStore,
    clock: Instant,
}

impl TerminalWorkspace {
    /// Workspace with one pane per document, the first one focused.
    pub fn new(documents: Vec<Document>, store: SharedBlockStore) -> Self {
        let mut workspace = Self {
            documents: BTreeMap::new(),
            panes: Vec::new(),
            active: 0,
            next_id: 1,
            store,
            clock: Instant::now(),
        };
        for document in documents {
            let file = document.file().clone();
            workspace.documents.insert(file.clone(), document);
            workspace.open_pane(file);
        }
        workspace
    }

    /// Shared sticky block store.
    pub fn store(&self) -> &SharedBlockStore {
        &self.store
    }

    /// Time source for animated scrolls started by the synchroniser.
    pub fn set_clock(&mut self, now: Instant) {
        self.clock = now;
    }

    fn open_pane(&mut self, file: FileId) -> ViewId {
        let id = ViewId::new(self.next_id);
        self.next_id += 1;
        self.panes.push(Pane::new(id, file));
        id
    }

    // ===== Documents =====

    /// Open document for `file`.
    pub fn document(&self, file: &FileId) -> Option<&Document> {
        self.documents.get(file)
    }

    /// Mutable open document for `file`.
    pub fn document_mut(&mut self, file: &FileId) -> Option<&mut Document> {
        self.documents.get_mut(file)
    }

    /// Every open file.
    pub fn files(&self) -> Vec<FileId> {
        self.documents.keys().cloned().collect()
    }

    // ===== Panes =====

    /// Panes in display order.
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Pane by id.
    pub fn pane(&self, view: ViewId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id == view)
    }

    fn pane_mut(&mut self, view: ViewId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id == view)
    }

    /// Focused pane.
    pub fn active_pane(&self) -> Option<&Pane> {
        self.panes.get(self.active)
    }

    /// Focus the next pane, wrapping around.
    pub fn focus_next(&mut self) {
        if !self.panes.is_empty() {
            self.active = (self.active + 1) % self.panes.len();
        }
    }

    /// Focus the pane with id `view`.
    pub fn focus(&mut self, view: ViewId) {
        if let Some(index) = self.panes.iter().position(|p| p.id == view) {
            self.active = index;
        }
    }

    /// Open a second pane on the focused document, right of the focused pane.
    pub fn split_active(&mut self) -> Option<ViewId> {
        let source = self.active_pane()?.clone();
        let id = ViewId::new(self.next_id);
        self.next_id += 1;
        let mut pane = Pane::new(id, source.file);
        pane.edit_mode = source.edit_mode;
        self.panes.insert(self.active + 1, pane);
        self.active += 1;
        debug!(%id, "split pane");
        Some(id)
    }

    /// Close the focused pane. The last pane is never closed.
    pub fn close_active(&mut self) -> Option<ViewId> {
        if self.panes.len() <= 1 {
            return None;
        }
        let pane = self.panes.remove(self.active);
        self.active = self.active.min(self.panes.len() - 1);
        debug!(id = %pane.id, "closed pane");
        Some(pane.id)
    }

    /// Cycle the focused pane through source, live preview and reading.
    pub fn cycle_edit_mode(&mut self) {
        if let Some(pane) = self.panes.get_mut(self.active) {
            pane.edit_mode = match pane.edit_mode {
                EditMode::Source => EditMode::LivePreview,
                EditMode::LivePreview => EditMode::Reading,
                EditMode::Reading => EditMode::Source,
            };
        }
    }

    /// Record the content rows of a pane after a resize.
    pub fn set_viewport_height(&mut self, view: ViewId, height: usize) {
        if let Some(pane) = self.pane_mut(view) {
            pane.viewport_height = height;
        }
    }

    /// Largest scroll offset for the pane: last document line at the top.
    fn max_scroll(&self, pane: &Pane) -> usize {
        let lines = self.documents.get(&pane.file).map_or(0, |d| d.lines().len());
        pane.padding + lines.saturating_sub(1)
    }

    /// Scroll by `delta` rows, cancelling any animation.
    pub fn scroll_by(&mut self, view: ViewId, delta: isize) {
        let Some(index) = self.panes.iter().position(|p| p.id == view) else {
            return;
        };
        let max = self.max_scroll(&self.panes[index]);
        let pane = &mut self.panes[index];
        pane.tween = None;
        pane.scroll_top = pane.scroll_top.saturating_add_signed(delta).min(max);
    }

    /// Jump to the top or bottom of the document.
    pub fn scroll_to_edge(&mut self, view: ViewId, bottom: bool) {
        let Some(index) = self.panes.iter().position(|p| p.id == view) else {
            return;
        };
        let max = self.max_scroll(&self.panes[index]);
        let pane = &mut self.panes[index];
        pane.tween = None;
        pane.scroll_top = if bottom { max } else { 0 };
    }

    /// Advance running animations. Returns the panes that moved.
    pub fn advance_tweens(&mut self, now: Instant) -> Vec<ViewId> {
        let mut moved = Vec::new();
        for pane in &mut self.panes {
            let Some(tween) = pane.tween else {
                continue;
            };
            let top = tween.sample(now);
            if tween.is_done(now) {
                pane.tween = None;
            }
            if top != pane.scroll_top {
                pane.scroll_top = top;
                moved.push(pane.id);
            }
        }
        moved
    }

    /// Whether any pane has a scroll tween running.
    pub fn is_animating(&self) -> bool {
        self.panes.iter().any(|p| p.tween.is_some())
    }
}

/// Heading title without inline markup, via the markdown renderer.
fn plain_heading_text(raw: &str) -> String {
    tui_markdown::from_str(raw)
        .lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

impl DisplayTextRenderer for TerminalWorkspace {
    fn render_display_text(&self, raw: &str) -> String {
        plain_heading_text(raw)
    }
}

impl Workspace for TerminalWorkspace {
    fn open_views(&self) -> Vec<OpenView> {
        self.panes
            .iter()
            .map(|pane| OpenView {
                id: pane.id,
                file: self
                    .documents
                    .contains_key(&pane.file)
                    .then(|| pane.file.clone()),
                edit_mode: pane.edit_mode,
            })
            .collect()
    }

    fn active_view(&self) -> Option<ViewId> {
        self.active_pane().map(|p| p.id)
    }

    fn outline(&self, view: ViewId) -> Option<Vec<OutlineItem>> {
        let pane = self.pane(view)?;
        let document = self.documents.get(&pane.file)?;
        Some(
            document
                .outline()
                .iter()
                .map(|item| OutlineItem {
                    offset: item.offset + pane.padding,
                    ..item.clone()
                })
                .collect(),
        )
    }

    fn scroll_metrics(&self, view: ViewId) -> Option<ScrollMetrics> {
        let pane = self.pane(view)?;
        Some(ScrollMetrics {
            scroll_top: pane.scroll_top,
            viewport_height: pane.viewport_height,
        })
    }

    fn set_top_padding(&mut self, view: ViewId, padding: usize) {
        if let Some(pane) = self.pane_mut(view) {
            trace!(%view, from = pane.padding, to = padding, "top padding");
            pane.padding = padding;
        }
    }

    fn scroll_to(&mut self, view: ViewId, top: usize, behaviour: ScrollBehaviour) {
        let now = self.clock;
        let Some(index) = self.panes.iter().position(|p| p.id == view) else {
            return;
        };
        let top = top.min(self.max_scroll(&self.panes[index]));
        let pane = &mut self.panes[index];
        match behaviour {
            ScrollBehaviour::Instant => {
                // Compensation during an animation moves the whole animation
                if let Some(tween) = pane.tween.as_mut() {
                    tween.shift(top as isize - pane.scroll_top as isize);
                }
                pane.scroll_top = top;
            }
            ScrollBehaviour::Animated => {
                pane.tween = Some(ScrollTween::new(
                    pane.scroll_top,
                    top,
                    now,
                    ANIMATION_DURATION,
                    Easing::EaseInOutCubic,
                ));
            }
        }
    }

    fn file_name_hidden(&self, view: ViewId) -> bool {
        self.pane(view).is_some_and(|p| p.scroll_top > p.padding)
    }

    fn create_renderer(&mut self, view: ViewId) -> Box<dyn HeadingRenderer> {
        Box::new(StickyRenderer::new(view, self.store.clone()))
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
