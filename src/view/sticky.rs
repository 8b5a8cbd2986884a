//! Sticky block renderer for terminal panes.
//!
//! Each tracked pane owns a [`StickyRenderer`]. Renderers lay out their block
//! into a [`BlockStore`] shared with the workspace; the draw pass reads the
//! store and paints each block over the top rows of its pane.

use crate::model::{EditMode, FileId, HeadingLevel, PinnedHeading, Settings, ViewId};
use crate::sync::{HeadingRenderer, MeasureTicket, RenderUpdate};
use crate::view::styles::HeadingStyles;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::trace;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns of indentation per indent level.
const INDENT_WIDTH: usize = 2;

// ===== Block model =====

/// One pinned row of a sticky block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyLine {
    /// Outline index, for click-to-jump.
    pub index: usize,
    /// Heading level.
    pub level: HeadingLevel,
    /// Nesting depth used for indentation.
    pub indent_level: usize,
    /// Text shown for the row.
    pub text: String,
}

/// A laid-out sticky block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StickyBlock {
    /// File name row shown above the headings.
    pub file_name: Option<String>,
    /// Pinned rows, outermost first.
    pub lines: Vec<StickyLine>,
    /// Settings the block was laid out with.
    pub settings: Settings,
}

impl StickyBlock {
    /// Rows the block occupies.
    pub fn height(&self) -> usize {
        self.lines.len() + usize::from(self.file_name.is_some())
    }

    /// Heading under row `row` of the block, if any.
    pub fn line_at_row(&self, row: usize) -> Option<&StickyLine> {
        let first = usize::from(self.file_name.is_some());
        row.checked_sub(first).and_then(|i| self.lines.get(i))
    }
}

/// Blocks and pending shadow measurements, keyed by pane.
#[derive(Debug, Default)]
pub struct BlockStore {
    blocks: BTreeMap<ViewId, StickyBlock>,
    shadows: Vec<(MeasureTicket, usize)>,
}

impl BlockStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block last laid out for `view`.
    pub fn block(&self, view: ViewId) -> Option<&StickyBlock> {
        self.blocks.get(&view)
    }

    /// Take every shadow measurement reported since the last call.
    pub fn drain_shadows(&mut self) -> Vec<(MeasureTicket, usize)> {
        std::mem::take(&mut self.shadows)
    }

    /// Number of panes with a block.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no pane has a block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Store shared between the workspace, its renderers and the draw pass.
pub type SharedBlockStore = Rc<RefCell<BlockStore>>;

// ===== Renderer =====

/// Lays out one pane's sticky block.
#[derive(Debug)]
pub struct StickyRenderer {
    view: ViewId,
    store: SharedBlockStore,
    settings: Settings,
    edit_mode: EditMode,
    /// Whether the last update showed the file name row.
    file_name_shown: bool,
}

impl StickyRenderer {
    /// Renderer for `view` writing into `store`.
    pub fn new(view: ViewId, store: SharedBlockStore) -> Self {
        Self {
            view,
            store,
            settings: Settings::default(),
            edit_mode: EditMode::default(),
            file_name_shown: false,
        }
    }

    fn layout(&self, headings: &[PinnedHeading], file: Option<&FileId>) -> StickyBlock {
        StickyBlock {
            file_name: file.map(FileId::name),
            lines: headings
                .iter()
                .map(|pinned| StickyLine {
                    index: pinned.index(),
                    level: pinned.level(),
                    indent_level: pinned.indent_level,
                    text: heading_text(pinned, self.edit_mode),
                })
                .collect(),
            settings: self.settings.clone(),
        }
    }
}

/// Source mode shows the heading markup, other modes its rendered title.
fn heading_text(pinned: &PinnedHeading, mode: EditMode) -> String {
    match mode {
        EditMode::Source => format!(
            "{} {}",
            "#".repeat(usize::from(pinned.level().get())),
            pinned.heading.text
        ),
        EditMode::LivePreview | EditMode::Reading => pinned.heading.display_text.clone(),
    }
}

impl HeadingRenderer for StickyRenderer {
    fn update_headings(&mut self, update: RenderUpdate<'_>) -> usize {
        let file = update.show_file_name.then_some(update.file);
        let block = self.layout(update.headings, file);
        let height = block.height();
        self.file_name_shown = update.show_file_name;
        trace!(
            view = %self.view,
            height,
            rows = block.lines.len(),
            "sticky block laid out"
        );
        self.store.borrow_mut().blocks.insert(self.view, block);
        height
    }

    fn update_edit_mode(&mut self, mode: EditMode) {
        self.edit_mode = mode;
    }

    fn update_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    fn render_shadow(&mut self, ticket: MeasureTicket, headings: &[PinnedHeading]) {
        let height = headings.len() + usize::from(self.file_name_shown);
        self.store.borrow_mut().shadows.push((ticket, height));
    }

    fn remove(&mut self) {
        self.store.borrow_mut().blocks.remove(&self.view);
    }
}

// ===== Drawing =====

/// Build the text lines of a block, truncating headings to `width` columns.
pub fn block_lines(block: &StickyBlock, styles: &HeadingStyles, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(block.height());
    if let Some(name) = &block.file_name {
        lines.push(Line::from(Span::styled(
            fit_width(name, width),
            styles.file_name(),
        )));
    }
    for line in &block.lines {
        let indent = " ".repeat(line.indent_level * INDENT_WIDTH);
        let badge = if block.settings.indicators {
            format!("{} ", line.level)
        } else {
            String::new()
        };
        let room = width.saturating_sub(indent.width() + badge.width());
        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled(badge, styles.indicator()),
            Span::styled(
                fit_width(&line.text, room),
                styles.heading(line.level, block.settings.style),
            ),
        ]));
    }
    lines
}

/// Cut `text` to at most `max` columns, ending in an ellipsis when cut.
fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Paint `block` over the top of `area`, clipped to the area height.
pub fn render_block(frame: &mut Frame, area: Rect, block: &StickyBlock, styles: &HeadingStyles) {
    let height = u16::try_from(block.height()).unwrap_or(u16::MAX).min(area.height);
    if height == 0 {
        return;
    }
    let block_area = Rect::new(area.x, area.y, area.width, height);
    frame.render_widget(Clear, block_area);
    frame.render_widget(
        Paragraph::new(block_lines(block, styles, usize::from(area.width))).style(styles.block()),
        block_area,
    );
}

#[cfg(test)]
#[path = "sticky_tests.rs"]
mod tests;
