//! Host capabilities consumed by the synchroniser.
//!
//! The host owns documents, views and drawing. The synchroniser only sees
//! these traits, so a terminal host, an editor plugin and the test fakes
//! all drive the same engine.

use crate::model::{
    EditMode, FileId, OutlineItem, PinnedHeading, ScrollBehaviour, Settings, ViewId,
};
use crate::outline::DisplayTextRenderer;
use crate::sync::measure::MeasureTicket;

/// A view the host currently has open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenView {
    /// Opaque identity.
    pub id: ViewId,
    /// File shown in the view, `None` while it has not resolved.
    pub file: Option<FileId>,
    /// Which surface is showing the document.
    pub edit_mode: EditMode,
}

/// Scroll position and viewport size of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    /// Scroll offset, in the unit of heading offsets.
    pub scroll_top: usize,
    /// Visible height.
    pub viewport_height: usize,
}

/// Document and view access provided by the host.
///
/// The display-text transform is part of the host: the synchroniser wraps it
/// in a [`crate::outline::HeadingTextCache`].
pub trait Workspace: DisplayTextRenderer {
    /// Every view currently open, in any order.
    fn open_views(&self) -> Vec<OpenView>;

    /// The focused view, if any.
    fn active_view(&self) -> Option<ViewId>;

    /// Current outline of the view's document with per-view offsets.
    ///
    /// May be stale until the host signals resolve. `None` when the file has
    /// no outline data.
    fn outline(&self, view: ViewId) -> Option<Vec<OutlineItem>>;

    /// Scroll metrics, `None` when the view has no scroller.
    fn scroll_metrics(&self, view: ViewId) -> Option<ScrollMetrics>;

    /// Reserve `padding` units above the content for the sticky block.
    fn set_top_padding(&mut self, view: ViewId, padding: usize);

    /// Scroll the view.
    fn scroll_to(&mut self, view: ViewId, top: usize, behaviour: ScrollBehaviour);

    /// Whether the file title is not otherwise visible in the view.
    fn file_name_hidden(&self, view: ViewId) -> bool;

    /// Create the sticky block renderer for a newly tracked view.
    fn create_renderer(&mut self, view: ViewId) -> Box<dyn HeadingRenderer>;
}

/// Everything a renderer needs for one update.
#[derive(Debug, Clone, Copy)]
pub struct RenderUpdate<'a> {
    /// Pinned headings, indents attached.
    pub headings: &'a [PinnedHeading],
    /// Show the file name above the headings.
    pub show_file_name: bool,
    /// File shown in the view.
    pub file: &'a FileId,
}

/// Sticky block renderer for one view.
pub trait HeadingRenderer {
    /// Replace the pinned headings and return the block's measured height.
    fn update_headings(&mut self, update: RenderUpdate<'_>) -> usize;

    /// The view switched between source, live preview and reading.
    fn update_edit_mode(&mut self, mode: EditMode);

    /// Settings changed.
    fn update_settings(&mut self, settings: &Settings);

    /// Lay out `headings` off screen and report the height later through
    /// [`crate::sync::Synchronizer::complete_measurement`] with `ticket`.
    fn render_shadow(&mut self, ticket: MeasureTicket, headings: &[PinnedHeading]);

    /// The view is no longer tracked.
    fn remove(&mut self);
}
