//! Per-view tracking table.

use crate::model::{EditMode, FileId, Heading, ViewId};
use crate::sync::host::HeadingRenderer;
use crate::sync::measure::MeasurementSlot;
use crate::sync::throttle::Throttle;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Whether the view's outline snapshot can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Outline is refetched on every refresh.
    #[default]
    Resolved,
    /// The document was edited and the host has not re-indexed it yet.
    /// Refreshes reuse the last trusted snapshot.
    Stale,
}

/// Everything the synchroniser keeps for one tracked view.
pub struct ViewState {
    /// File shown in the view.
    pub file: FileId,
    /// Last outline snapshot, display text applied.
    pub outline: Vec<Heading>,
    /// Sticky block renderer owned by this view.
    pub renderer: Box<dyn HeadingRenderer>,
    /// Trust in `outline`.
    pub state: TrackState,
    /// Height reported by the last render, also the current top padding.
    pub last_height: usize,
    /// Surface currently showing the document.
    pub edit_mode: EditMode,
    /// Index of the last pinned heading from the last refresh.
    pub current_index: Option<usize>,
    /// Rate limiter standing in for the view's scroll listener.
    pub scroll_throttle: Throttle,
    /// Height measurement in flight.
    pub measurement: MeasurementSlot,
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("file", &self.file)
            .field("headings", &self.outline.len())
            .field("state", &self.state)
            .field("last_height", &self.last_height)
            .field("edit_mode", &self.edit_mode)
            .field("current_index", &self.current_index)
            .finish_non_exhaustive()
    }
}

/// Tracked views keyed by identity. At most one entry per view.
#[derive(Debug, Default)]
pub struct ViewTable {
    views: BTreeMap<ViewId, ViewState>,
}

impl ViewTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `view`, returning the entry it replaced.
    pub fn insert(&mut self, view: ViewId, state: ViewState) -> Option<ViewState> {
        self.views.insert(view, state)
    }

    /// Stop tracking `view`.
    pub fn remove(&mut self, view: ViewId) -> Option<ViewState> {
        self.views.remove(&view)
    }

    /// State of a tracked view.
    pub fn get(&self, view: ViewId) -> Option<&ViewState> {
        self.views.get(&view)
    }

    /// Mutable state of a tracked view.
    pub fn get_mut(&mut self, view: ViewId) -> Option<&mut ViewState> {
        self.views.get_mut(&view)
    }

    /// Whether `view` is tracked.
    pub fn contains(&self, view: ViewId) -> bool {
        self.views.contains_key(&view)
    }

    /// Drop every entry not in `live`, returning the dropped entries.
    pub fn retain_live(&mut self, live: &HashSet<ViewId>) -> Vec<(ViewId, ViewState)> {
        let dead: Vec<ViewId> = self
            .views
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        dead.into_iter()
            .filter_map(|id| self.views.remove(&id).map(|state| (id, state)))
            .collect()
    }

    /// Tracked views showing `file`.
    pub fn views_for_file(&self, file: &FileId) -> Vec<ViewId> {
        self.views
            .iter()
            .filter(|(_, state)| &state.file == file)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Tracked view ids in ascending order.
    pub fn ids(&self) -> Vec<ViewId> {
        self.views.keys().copied().collect()
    }

    /// Tracked views in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ViewId, &ViewState)> {
        self.views.iter().map(|(id, state)| (*id, state))
    }

    /// Mutable iteration in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ViewId, &mut ViewState)> {
        self.views.iter_mut().map(|(id, state)| (*id, state))
    }

    /// Number of tracked views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PinnedHeading, Settings};
    use crate::sync::host::RenderUpdate;
    use crate::sync::measure::MeasureTicket;
    use crate::sync::throttle::ThrottlePolicy;
    use std::time::Duration;

    struct NullRenderer;

    impl HeadingRenderer for NullRenderer {
        fn update_headings(&mut self, update: RenderUpdate<'_>) -> usize {
            update.headings.len()
        }
        fn update_edit_mode(&mut self, _mode: EditMode) {}
        fn update_settings(&mut self, _settings: &Settings) {}
        fn render_shadow(&mut self, _ticket: MeasureTicket, _headings: &[PinnedHeading]) {}
        fn remove(&mut self) {}
    }

    fn state(view: u64, file: &str) -> ViewState {
        ViewState {
            file: FileId::new(file).unwrap(),
            outline: Vec::new(),
            renderer: Box::new(NullRenderer),
            state: TrackState::Resolved,
            last_height: 0,
            edit_mode: EditMode::LivePreview,
            current_index: None,
            scroll_throttle: Throttle::new(Duration::from_millis(50), ThrottlePolicy::default()),
            measurement: MeasurementSlot::new(ViewId::new(view)),
        }
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut table = ViewTable::new();
        assert!(table.insert(ViewId::new(1), state(1, "a.md")).is_none());
        assert!(table.insert(ViewId::new(1), state(1, "b.md")).is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn retain_live_returns_dropped_entries() {
        let mut table = ViewTable::new();
        table.insert(ViewId::new(1), state(1, "a.md"));
        table.insert(ViewId::new(2), state(2, "a.md"));
        table.insert(ViewId::new(3), state(3, "b.md"));

        let live: HashSet<ViewId> = [ViewId::new(2)].into_iter().collect();
        let dropped: Vec<ViewId> = table
            .retain_live(&live)
            .into_iter()
            .map(|(id, _)| id)
            .collect();

        assert_eq!(dropped, vec![ViewId::new(1), ViewId::new(3)]);
        assert_eq!(table.ids(), vec![ViewId::new(2)]);
    }

    #[test]
    fn views_for_file_filters_by_file() {
        let mut table = ViewTable::new();
        table.insert(ViewId::new(1), state(1, "a.md"));
        table.insert(ViewId::new(2), state(2, "b.md"));
        table.insert(ViewId::new(3), state(3, "a.md"));

        let file = FileId::new("a.md").unwrap();
        assert_eq!(
            table.views_for_file(&file),
            vec![ViewId::new(1), ViewId::new(3)]
        );
    }
}
