//! View Synchronizer
//!
//! Owns the tracking table and reacts to host events. Every handler
//! re-derives the pinned set from the current scroll position, so a dropped
//! or reordered event is corrected by the next one.
//!
//! Public handlers never fail: each [`SyncError`] is logged and the affected
//! view keeps whatever it last showed, or nothing.

use crate::model::{FileId, Heading, Settings, SyncError, ViewId};
use crate::navigator::{jump_scroll_top, JumpRequest, NavigatorSession, StatusIndicator};
use crate::outline::{pin, ExpectedHeadings, HeadingTextCache};
use crate::sync::host::{RenderUpdate, Workspace};
use crate::sync::measure::{MeasureTicket, MeasurementSlot};
use crate::sync::throttle::{Throttle, ThrottlePolicy};
use crate::sync::tracking::{TrackState, ViewState, ViewTable};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Default scroll throttle window.
pub const DEFAULT_SCROLL_WINDOW: Duration = Duration::from_millis(50);

/// Timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Scroll throttle window.
    pub scroll_window: Duration,
    /// Scroll throttle edges.
    pub scroll_policy: ThrottlePolicy,
    /// Abandon a height measurement after this long. `None` waits forever.
    pub measure_timeout: Option<Duration>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            scroll_window: DEFAULT_SCROLL_WINDOW,
            scroll_policy: ThrottlePolicy::default(),
            measure_timeout: None,
        }
    }
}

/// Keeps every tracked view's sticky block in step with its scroll position.
pub struct Synchronizer<W: Workspace> {
    workspace: W,
    settings: Settings,
    options: SyncOptions,
    cache: HeadingTextCache,
    table: ViewTable,
    status: StatusIndicator,
}

impl<W: Workspace> Synchronizer<W> {
    /// Create a synchroniser. Nothing is tracked until the first
    /// [`reconcile`](Self::reconcile).
    pub fn new(workspace: W, settings: Settings, options: SyncOptions, cache: HeadingTextCache) -> Self {
        let status = StatusIndicator::new(settings.show_in_status_bar);
        Self {
            workspace,
            settings,
            options,
            cache,
            table: ViewTable::new(),
            status,
        }
    }

    /// The host.
    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// Mutable access to the host.
    pub fn workspace_mut(&mut self) -> &mut W {
        &mut self.workspace
    }

    /// Settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Tracking table.
    pub fn views(&self) -> &ViewTable {
        &self.table
    }

    /// Display-text cache shared by all views.
    pub fn cache(&self) -> &HeadingTextCache {
        &self.cache
    }

    /// Status bar indicator.
    pub fn status(&self) -> &StatusIndicator {
        &self.status
    }

    // ===== Membership =====

    /// Diff open views against the tracking table.
    ///
    /// Adds markdown views with a resolved file, drops views that closed or
    /// lost their file, and follows views that switched file. Idempotent.
    pub fn reconcile(&mut self) {
        let open: Vec<_> = self
            .workspace
            .open_views()
            .into_iter()
            .filter_map(|view| {
                let file = view.file.filter(FileId::is_markdown)?;
                Some((view.id, file, view.edit_mode))
            })
            .collect();
        let live: HashSet<ViewId> = open.iter().map(|(id, _, _)| *id).collect();

        for (view, mut state) in self.table.retain_live(&live) {
            state.measurement.cancel();
            state.renderer.remove();
            info!(%view, file = %state.file, "untracked view");
        }

        for (view, file, edit_mode) in open {
            match self.table.get_mut(view) {
                Some(entry) => {
                    if entry.file != file {
                        info!(%view, from = %entry.file, to = %file, "view switched file");
                        entry.file = file;
                        entry.state = TrackState::Resolved;
                        entry.outline.clear();
                        entry.current_index = None;
                        entry.measurement.cancel();
                    }
                    entry.edit_mode = edit_mode;
                    entry.renderer.update_edit_mode(edit_mode);
                }
                None => {
                    let mut renderer = self.workspace.create_renderer(view);
                    renderer.update_settings(&self.settings);
                    renderer.update_edit_mode(edit_mode);
                    info!(%view, %file, "tracking view");
                    self.table.insert(
                        view,
                        ViewState {
                            file,
                            outline: Vec::new(),
                            renderer,
                            state: TrackState::Resolved,
                            last_height: 0,
                            edit_mode,
                            current_index: None,
                            scroll_throttle: Throttle::new(
                                self.options.scroll_window,
                                self.options.scroll_policy,
                            ),
                            measurement: MeasurementSlot::new(view),
                        },
                    );
                }
            }
        }

        let active_tracked = self
            .workspace
            .active_view()
            .is_some_and(|view| self.table.contains(view));
        if !active_tracked {
            self.status.hide();
        }
    }

    // ===== Event handlers =====

    /// Views were opened, closed or rearranged.
    pub fn on_layout_change(&mut self) {
        self.reconcile();
        self.refresh_all();
    }

    /// Focus moved to another view.
    pub fn on_active_view_change(&mut self) {
        self.reconcile();
        self.refresh_all();
    }

    /// The view scrolled. Throttled per view.
    pub fn on_scroll(&mut self, view: ViewId, now: Instant) {
        let Some(entry) = self.table.get_mut(view) else {
            trace!(%view, "scroll on untracked view");
            return;
        };
        if entry.scroll_throttle.call(now) {
            self.refresh(view);
        }
    }

    /// The view changed size.
    pub fn on_resize(&mut self, view: ViewId) {
        self.refresh(view);
    }

    /// The document behind `file` was edited. Its outline is untrusted
    /// until [`on_resolve`](Self::on_resolve).
    pub fn on_editor_change(&mut self, file: &FileId) {
        for view in self.table.views_for_file(file) {
            if let Some(entry) = self.table.get_mut(view) {
                if entry.state == TrackState::Resolved {
                    let err = SyncError::UnresolvedFile { view };
                    debug!(%err, "outline marked stale");
                }
                entry.state = TrackState::Stale;
            }
        }
    }

    /// The host re-indexed `file`. Forces a recompute of every view showing it.
    pub fn on_resolve(&mut self, file: &FileId) {
        self.reconcile();
        let views = self.table.views_for_file(file);
        for &view in &views {
            if let Some(entry) = self.table.get_mut(view) {
                entry.state = TrackState::Resolved;
            }
        }
        debug!(%file, views = views.len(), "outline resolved");
        for view in views {
            self.refresh(view);
        }
    }

    /// New settings: pushed to every renderer, then every view recomputes.
    pub fn on_settings_changed(&mut self, settings: Settings) {
        info!(?settings, "settings changed");
        self.status.set_enabled(settings.show_in_status_bar);
        for (_, entry) in self.table.iter_mut() {
            entry.renderer.update_settings(&settings);
        }
        self.settings = settings;
        self.refresh_all();
    }

    /// Fire trailing scroll refreshes that are due and expire overdue
    /// measurements.
    pub fn tick(&mut self, now: Instant) {
        let due: Vec<ViewId> = self
            .table
            .iter_mut()
            .filter_map(|(view, entry)| entry.scroll_throttle.poll(now).then_some(view))
            .collect();
        for view in due {
            self.refresh(view);
        }

        if let Some(timeout) = self.options.measure_timeout {
            for (_, entry) in self.table.iter_mut() {
                if let Some(err) = entry.measurement.expire(now, timeout) {
                    debug!(%err, "abandoned measurement");
                }
            }
        }
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let throttle = self
            .table
            .iter()
            .filter_map(|(_, entry)| entry.scroll_throttle.next_deadline());
        let measure = self.options.measure_timeout.into_iter().flat_map(|timeout| {
            self.table.iter().filter_map(move |(_, entry)| {
                entry.measurement.in_flight().map(|p| p.started + timeout)
            })
        });
        throttle.chain(measure).min()
    }

    // ===== Recompute pipeline =====

    /// Recompute every tracked view.
    pub fn refresh_all(&mut self) {
        for view in self.table.ids() {
            self.refresh(view);
        }
    }

    /// Recompute one view: outline, pinned set, render, padding.
    pub fn refresh(&mut self, view: ViewId) {
        if let Err(err) = self.try_refresh(view) {
            debug!(%err, "refresh skipped");
        }
    }

    fn try_refresh(&mut self, view: ViewId) -> Result<(), SyncError> {
        let Self {
            workspace,
            settings,
            cache,
            table,
            status,
            ..
        } = self;
        let entry = table.get_mut(view).ok_or(SyncError::DetachedView { view })?;

        match entry.state {
            TrackState::Resolved => match fetch_outline(workspace, cache, view) {
                Ok(outline) => entry.outline = outline,
                Err(err) => {
                    debug!(%err, "showing no headings");
                    entry.outline.clear();
                }
            },
            TrackState::Stale => trace!(%view, "reusing last outline snapshot"),
        }

        let metrics = workspace
            .scroll_metrics(view)
            .ok_or(SyncError::NoScrollMetrics { view })?;
        let threshold = metrics.scroll_top + entry.last_height;
        let pinned = pin(&entry.outline, threshold, settings.mode, settings.max);
        entry.current_index = pinned.last().map(|p| p.index());

        let show_file_name = settings.auto_show_file_name && workspace.file_name_hidden(view);
        let height = entry.renderer.update_headings(RenderUpdate {
            headings: &pinned,
            show_file_name,
            file: &entry.file,
        });

        if height != entry.last_height {
            let delta = height as isize - entry.last_height as isize;
            trace!(%view, from = entry.last_height, to = height, "sticky block resized");
            rebase_offsets(&mut entry.outline, entry.last_height, height);
            workspace.set_top_padding(view, height);
            workspace.scroll_to(
                view,
                metrics.scroll_top.saturating_add_signed(delta),
                crate::model::ScrollBehaviour::Instant,
            );
            entry.last_height = height;
        }

        if workspace.active_view() == Some(view) {
            status.switch_file(view, &entry.file, pinned.last());
        }
        Ok(())
    }

    // ===== Navigation =====

    /// Open the heading picker on the active view.
    pub fn open_navigator(&self) -> Option<NavigatorSession> {
        let view = self.workspace.active_view()?;
        let entry = self.table.get(view)?;
        Some(NavigatorSession::new(view, &entry.outline, entry.current_index))
    }

    /// Current heading of `view`: the last pinned one.
    pub fn current_heading(&self, view: ViewId) -> Option<&Heading> {
        let entry = self.table.get(view)?;
        entry.outline.get(entry.current_index?)
    }

    /// Start a jump. The view scrolls once the renderer reports the
    /// predicted block height through
    /// [`complete_measurement`](Self::complete_measurement).
    pub fn begin_jump(&mut self, request: JumpRequest, now: Instant) -> Option<MeasureTicket> {
        match self.predict_headings_height(request, now) {
            Ok(ticket) => Some(ticket),
            Err(err) => {
                debug!(%err, "jump dropped");
                None
            }
        }
    }

    /// Phase one of a measurement: render the pinned set the target would
    /// produce off screen. Replaces any measurement already in flight.
    pub fn predict_headings_height(
        &mut self,
        request: JumpRequest,
        now: Instant,
    ) -> Result<MeasureTicket, SyncError> {
        let view = request.view;
        let entry = self
            .table
            .get_mut(view)
            .ok_or(SyncError::DetachedView { view })?;
        if request.index >= entry.outline.len() {
            return Err(SyncError::UnknownHeading {
                view,
                index: request.index,
            });
        }
        let expected = ExpectedHeadings::new(
            entry.outline.clone(),
            self.settings.max,
            self.settings.mode,
        )
        .at(request.index);
        if let Some(replaced) = entry.measurement.in_flight() {
            trace!(%view, seq = replaced.ticket.seq, "replacing measurement");
        }
        let ticket = entry.measurement.begin(request, now);
        entry.renderer.render_shadow(ticket, &expected);
        Ok(ticket)
    }

    /// Phase two: the host measured the shadow block.
    ///
    /// Applies the predicted height as padding and scrolls so the target
    /// heading is the last pinned one. Returns whether the jump happened.
    pub fn complete_measurement(&mut self, ticket: MeasureTicket, height: usize) -> bool {
        match self.try_complete_measurement(ticket, height) {
            Ok(()) => {
                self.refresh(ticket.view);
                true
            }
            Err(err) => {
                debug!(%err, "measurement ignored");
                false
            }
        }
    }

    fn try_complete_measurement(
        &mut self,
        ticket: MeasureTicket,
        height: usize,
    ) -> Result<(), SyncError> {
        let view = ticket.view;
        let entry = self
            .table
            .get_mut(view)
            .ok_or(SyncError::DetachedView { view })?;
        let pending = entry.measurement.complete(ticket)?;
        let index = pending.jump.index;
        let target = entry
            .outline
            .get(index)
            .ok_or(SyncError::UnknownHeading { view, index })?;
        let top = jump_scroll_top(target.offset, entry.last_height, height);
        debug!(%view, index, top, height, "jumping to heading");

        self.workspace.set_top_padding(view, height);
        rebase_offsets(&mut entry.outline, entry.last_height, height);
        entry.last_height = height;
        self.workspace
            .scroll_to(view, top, self.settings.scroll_behaviour);
        Ok(())
    }

    /// Remove every renderer and forget every view.
    pub fn shutdown(&mut self) {
        for view in self.table.ids() {
            if let Some(mut state) = self.table.remove(view) {
                state.measurement.cancel();
                state.renderer.remove();
            }
        }
        self.status.hide();
        info!("synchroniser shut down");
    }
}

/// Shift snapshot offsets from one top padding to another, so they stay in
/// the coordinates the host reports under the new padding.
fn rebase_offsets(outline: &mut [Heading], from: usize, to: usize) {
    for heading in outline {
        heading.offset = heading.offset.saturating_sub(from) + to;
    }
}

/// Fetch the host outline and apply cached display text.
fn fetch_outline<W: Workspace>(
    workspace: &W,
    cache: &mut HeadingTextCache,
    view: ViewId,
) -> Result<Vec<Heading>, SyncError> {
    let items = workspace
        .outline(view)
        .ok_or(SyncError::MissingOutline { view })?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let display_text = cache.get_or_render(&item.text, workspace);
            Heading::from_item(index, item, display_text)
        })
        .collect())
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
