//! Black-box scenarios for the synchroniser through the public host traits.
//!
//! The host below is a plain padded scroller: one unit per line, the sticky
//! block takes one unit per pinned heading, and heading offsets move down
//! with the top padding.

use sticky_headings::model::{
    DisplayMode, EditMode, FileId, OutlineItem, PinnedHeading, ScrollBehaviour, Settings, ViewId,
};
use sticky_headings::navigator::JumpRequest;
use sticky_headings::outline::{DisplayTextRenderer, HeadingTextCache};
use sticky_headings::source::extract_outline;
use sticky_headings::sync::{
    HeadingRenderer, MeasureTicket, OpenView, RenderUpdate, ScrollMetrics, SyncOptions,
    Synchronizer, Workspace,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

const DOC: &str = "\
# Intro
a
b
## Part one
c
d
e
## Part two
f
### Detail
g
h
i
j
";

type Shared = Rc<RefCell<BTreeMap<ViewId, Vec<String>>>>;
type Shadows = Rc<RefCell<Vec<(MeasureTicket, usize)>>>;

struct Renderer {
    view: ViewId,
    pinned: Shared,
    shadows: Shadows,
}

impl HeadingRenderer for Renderer {
    fn update_headings(&mut self, update: RenderUpdate<'_>) -> usize {
        let texts = update
            .headings
            .iter()
            .map(|p| p.heading.display_text.clone())
            .collect();
        self.pinned.borrow_mut().insert(self.view, texts);
        update.headings.len()
    }

    fn update_edit_mode(&mut self, _mode: EditMode) {}

    fn update_settings(&mut self, _settings: &Settings) {}

    fn render_shadow(&mut self, ticket: MeasureTicket, headings: &[PinnedHeading]) {
        self.shadows.borrow_mut().push((ticket, headings.len()));
    }

    fn remove(&mut self) {
        self.pinned.borrow_mut().remove(&self.view);
    }
}

struct Scroller {
    file: FileId,
    text: String,
    scroll_top: usize,
    padding: usize,
}

#[derive(Default)]
struct Host {
    views: BTreeMap<ViewId, Scroller>,
    pinned: Shared,
    shadows: Shadows,
}

impl Host {
    fn with_view(text: &str) -> Self {
        let mut host = Self::default();
        host.views.insert(
            ViewId::new(1),
            Scroller {
                file: FileId::new("doc.md").unwrap(),
                text: text.to_string(),
                scroll_top: 0,
                padding: 0,
            },
        );
        host
    }
}

impl DisplayTextRenderer for Host {
    fn render_display_text(&self, raw: &str) -> String {
        raw.to_uppercase()
    }
}

impl Workspace for Host {
    fn open_views(&self) -> Vec<OpenView> {
        self.views
            .iter()
            .map(|(id, view)| OpenView {
                id: *id,
                file: Some(view.file.clone()),
                edit_mode: EditMode::Reading,
            })
            .collect()
    }

    fn active_view(&self) -> Option<ViewId> {
        self.views.keys().next().copied()
    }

    fn outline(&self, view: ViewId) -> Option<Vec<OutlineItem>> {
        let view = self.views.get(&view)?;
        Some(
            extract_outline(&view.text)
                .into_iter()
                .map(|item| OutlineItem {
                    offset: item.offset + view.padding,
                    ..item
                })
                .collect(),
        )
    }

    fn scroll_metrics(&self, view: ViewId) -> Option<ScrollMetrics> {
        let view = self.views.get(&view)?;
        Some(ScrollMetrics {
            scroll_top: view.scroll_top,
            viewport_height: 5,
        })
    }

    fn set_top_padding(&mut self, view: ViewId, padding: usize) {
        if let Some(view) = self.views.get_mut(&view) {
            view.padding = padding;
        }
    }

    fn scroll_to(&mut self, view: ViewId, top: usize, _behaviour: ScrollBehaviour) {
        if let Some(view) = self.views.get_mut(&view) {
            view.scroll_top = top;
        }
    }

    fn file_name_hidden(&self, _view: ViewId) -> bool {
        false
    }

    fn create_renderer(&mut self, view: ViewId) -> Box<dyn HeadingRenderer> {
        Box::new(Renderer {
            view,
            pinned: Rc::clone(&self.pinned),
            shadows: Rc::clone(&self.shadows),
        })
    }
}

fn view() -> ViewId {
    ViewId::new(1)
}

fn engine(settings: Settings) -> Synchronizer<Host> {
    let mut sync = Synchronizer::new(
        Host::with_view(DOC),
        settings,
        SyncOptions::default(),
        HeadingTextCache::new(),
    );
    sync.on_layout_change();
    sync
}

fn pinned(sync: &Synchronizer<Host>) -> Vec<String> {
    sync.workspace()
        .pinned
        .borrow()
        .get(&view())
        .cloned()
        .unwrap_or_default()
}

fn scroll_by(sync: &mut Synchronizer<Host>, delta: usize, now: Instant) {
    if let Some(view) = sync.workspace_mut().views.get_mut(&view()) {
        view.scroll_top += delta;
    }
    sync.on_scroll(view(), now);
}

/// Run a jump through both measurement phases.
fn jump(sync: &mut Synchronizer<Host>, index: usize, now: Instant) {
    let heading = sync.open_navigator().unwrap().jump_request(index).unwrap();
    assert_eq!(heading.index, index);
    let ticket = sync.begin_jump(heading, now).unwrap();
    let (shadow_ticket, height) = sync.workspace().shadows.borrow_mut().pop().unwrap();
    assert_eq!(shadow_ticket, ticket);
    assert!(sync.complete_measurement(ticket, height));
}

#[test]
fn scrolling_pins_headings_and_compensates_padding() {
    let mut sync = engine(Settings::default());
    assert!(pinned(&sync).is_empty());

    scroll_by(&mut sync, 1, Instant::now());

    assert_eq!(pinned(&sync), vec!["INTRO"]);
    let scroller = &sync.workspace().views[&view()];
    assert_eq!(scroller.padding, 1);
    assert_eq!(scroller.scroll_top, 2);
}

#[test]
fn jump_leaves_target_as_last_pinned_heading() {
    let mut sync = engine(Settings::default());
    jump(&mut sync, 3, Instant::now());

    assert_eq!(pinned(&sync), vec!["INTRO", "PART ONE", "PART TWO", "DETAIL"]);
    assert_eq!(sync.current_heading(view()).unwrap().text, "Detail");
    assert_eq!(sync.status().label().as_deref(), Some("doc › DETAIL"));
}

#[test]
fn jump_after_block_resize_uses_current_offsets() {
    let mut sync = engine(Settings::default());
    let now = Instant::now();
    // Pins INTRO and grows the padding from 0 to 1 after the outline was read
    scroll_by(&mut sync, 1, now);
    assert_eq!(sync.workspace().views[&view()].padding, 1);

    jump(&mut sync, 2, now);

    assert_eq!(pinned(&sync), vec!["INTRO", "PART TWO"]);
    assert_eq!(sync.current_heading(view()).unwrap().text, "Part two");
    let scroller = &sync.workspace().views[&view()];
    assert_eq!(scroller.padding, 2);
    assert_eq!(scroller.scroll_top, 8);
}

#[test]
fn concise_jump_predicts_the_shorter_block() {
    let settings = Settings {
        mode: DisplayMode::Concise,
        ..Settings::default()
    };
    let mut sync = engine(settings);
    jump(&mut sync, 3, Instant::now());

    assert_eq!(pinned(&sync), vec!["INTRO", "PART TWO", "DETAIL"]);
    assert_eq!(sync.workspace().views[&view()].padding, 3);
}

#[test]
fn superseded_measurement_is_ignored() {
    let mut sync = engine(Settings::default());
    let now = Instant::now();
    let request = |index| JumpRequest {
        view: view(),
        index,
    };
    let first = sync.begin_jump(request(1), now).unwrap();
    let second = sync.begin_jump(request(2), now).unwrap();

    assert!(!sync.complete_measurement(first, 2));
    assert!(sync.complete_measurement(second, 2));
}

#[test]
fn expired_measurement_is_abandoned() {
    let mut sync = Synchronizer::new(
        Host::with_view(DOC),
        Settings::default(),
        SyncOptions {
            measure_timeout: Some(Duration::from_millis(100)),
            ..SyncOptions::default()
        },
        HeadingTextCache::new(),
    );
    sync.on_layout_change();
    let t0 = Instant::now();
    let request = sync.open_navigator().unwrap().jump_request(1).unwrap();
    let ticket = sync.begin_jump(request, t0).unwrap();

    sync.tick(t0 + Duration::from_millis(150));
    assert!(!sync.complete_measurement(ticket, 2));
}

#[test]
fn edit_waits_for_resolve() {
    let mut sync = engine(Settings::default());
    let t0 = Instant::now();
    scroll_by(&mut sync, 1, t0);
    assert_eq!(pinned(&sync), vec!["INTRO"]);

    let file = FileId::new("doc.md").unwrap();
    sync.on_editor_change(&file);
    sync.workspace_mut()
        .views
        .get_mut(&view())
        .unwrap()
        .text = DOC.replacen("# Intro", "# Preface", 1);
    sync.refresh(view());
    assert_eq!(pinned(&sync), vec!["INTRO"]);

    sync.on_resolve(&file);
    assert_eq!(pinned(&sync), vec!["PREFACE"]);
}

#[test]
fn document_without_headings_pins_nothing() {
    let mut sync = Synchronizer::new(
        Host::with_view("just\nsome\ntext\n"),
        Settings::default(),
        SyncOptions::default(),
        HeadingTextCache::new(),
    );
    sync.on_layout_change();
    scroll_by(&mut sync, 2, Instant::now());
    assert!(pinned(&sync).is_empty());
    assert_eq!(sync.workspace().views[&view()].padding, 0);
}

#[test]
fn closing_the_view_removes_its_block() {
    let mut sync = engine(Settings::default());
    scroll_by(&mut sync, 1, Instant::now());
    assert_eq!(sync.views().len(), 1);

    sync.workspace_mut().views.clear();
    sync.on_layout_change();

    assert!(sync.views().is_empty());
    assert!(sync.workspace().pinned.borrow().is_empty());
    assert_eq!(sync.status().label(), None);
}

#[test]
fn shutdown_forgets_every_view() {
    let mut sync = engine(Settings::default());
    sync.shutdown();
    assert!(sync.views().is_empty());
    assert!(sync.workspace().pinned.borrow().is_empty());
}

#[test]
fn display_text_is_rendered_once_per_heading() {
    let mut sync = engine(Settings::default());
    let t0 = Instant::now();
    for step in 0..5u64 {
        scroll_by(&mut sync, 1, t0 + Duration::from_millis(100 * step));
    }
    assert_eq!(sync.cache().len(), 4);
}
