//! Heading navigator: one picker session over a view's outline.

use crate::model::{Heading, HeadingLevel, ViewId};

/// Request to scroll `view` so heading `index` becomes the last pinned one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
///
/// Only the heading index is carried. Its offset is read from the view's
/// outline when the measurement completes, since the block height (and so
/// every offset) may change while the request is in flight.
pub struct JumpRequest {
    /// View to scroll.
    pub view: ViewId,
    /// Index of the target heading in the view's outline.
    pub index: usize,
}

/// One row of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Index into the outline.
    pub index: usize,
    /// Heading level.
    pub level: HeadingLevel,
    /// Text shown in the picker.
    pub display_text: String,
    /// Offset when the session was opened.
    pub offset: usize,
}

/// Snapshot of a view's outline opened in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorSession {
    view: ViewId,
    items: Vec<NavItem>,
    current: Option<usize>,
}

impl NavigatorSession {
    /// Open a session. `current` preselects the view's current heading.
    pub fn new(view: ViewId, outline: &[Heading], current: Option<usize>) -> Self {
        let items = outline
            .iter()
            .map(|h| NavItem {
                index: h.index,
                level: h.level,
                display_text: h.display_text.clone(),
                offset: h.offset,
            })
            .collect();
        Self {
            view,
            items,
            current,
        }
    }

    /// View the session was opened over.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// All headings, in document order.
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Index of the heading to preselect.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Items whose display text contains `query`, ignoring case.
    /// An empty query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&NavItem> {
        let needle = query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| needle.is_empty() || item.display_text.to_lowercase().contains(&needle))
            .collect()
    }

    /// Jump for the chosen heading, `None` if it is not in the session.
    pub fn jump_request(&self, index: usize) -> Option<JumpRequest> {
        self.items
            .iter()
            .find(|item| item.index == index)
            .map(|item| JumpRequest {
                view: self.view,
                index: item.index,
            })
    }
}

/// Scroll offset that leaves the target heading as the last pinned entry.
///
/// `offset` is the target's offset under the current top padding
/// (`padding`, the height of the block now on screen). It is rebased onto
/// the predicted block height, then the view is scrolled one unit past it
/// so it falls under the threshold.
pub fn jump_scroll_top(offset: usize, padding: usize, predicted_height: usize) -> usize {
    let rebased = offset.saturating_sub(padding) + predicted_height;
    (rebased + 1).saturating_sub(predicted_height)
}
