//! Snapshot tests for the whole terminal screen.
//!
//! Uses insta + ratatui TestBackend so that layout regressions in the pane
//! border, the sticky block and the status bar show up as a diff.

use crate::model::Settings;
use crate::test_harness::AcceptanceTestHarness;
use crossterm::event::KeyCode;

fn guide() -> String {
    let mut lines = vec![
        "# Guide".to_string(),
        "intro".to_string(),
        String::new(),
        "## Install".to_string(),
        "step one".to_string(),
        "step two".to_string(),
        "step three".to_string(),
        "## Usage".to_string(),
        "run it".to_string(),
        "### Advanced".to_string(),
    ];
    lines.extend((10..30).map(|n| format!("text {n}")));
    lines.join("\n")
}

fn small_screen() -> AcceptanceTestHarness {
    let text = guide();
    AcceptanceTestHarness::with_documents(&[("guide.md", text.as_str())], Settings::default(), 40, 12)
}

#[test]
fn snapshot_top_of_document() {
    let mut harness = small_screen();
    insta::assert_snapshot!(harness.render_to_string(), @r"
    ┌──────────────────────────────────────┐
    │# Guide                               │
    │intro                                 │
    │                                      │
    │## Install                            │
    │step one                              │
    │step two                              │
    │step three                            │
    │## Usage                              │
    │run it                                │
    └──────────────────────────────────────┘
     guide  [default max:∞ instant] o: headi
    ");
}

#[test]
fn snapshot_after_jump_to_nested_heading() {
    let mut harness = small_screen();
    harness.press('o');
    harness.type_text("adv");
    harness.press_code(KeyCode::Enter);

    insta::assert_snapshot!(harness.render_to_string(), @r"
    ┌──────────────────────────────────────┐
    │H1 Guide                              │
    │  H2 Install                          │
    │  H2 Usage                            │
    │    H3 Advanced                       │
    │text 10                               │
    │text 11                               │
    │text 12                               │
    │text 13                               │
    │text 14                               │
    └──────────────────────────────────────┘
     guide › Advanced  [default max:∞ instan
    ");
}
