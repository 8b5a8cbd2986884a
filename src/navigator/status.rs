//! Status-bar indicator showing the active view's current heading.

use crate::model::{FileId, HeadingLevel, PinnedHeading, ViewId};

/// Heading shown in the indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHeading {
    /// Outline index.
    pub index: usize,
    /// Heading level.
    pub level: HeadingLevel,
    /// Rendered heading text.
    pub display_text: String,
}

/// What the indicator currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Active view.
    pub view: ViewId,
    /// File shown in the view.
    pub file: FileId,
    /// Current heading, `None` above the first one.
    pub heading: Option<StatusHeading>,
}

/// Indicator state: enabled by settings, hidden when no markdown view is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    enabled: bool,
    current: Option<StatusEntry>,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl StatusIndicator {
    /// Hidden indicator, shown only if `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: None,
        }
    }

    /// Show `file` and its current heading for `view`.
    pub fn switch_file(&mut self, view: ViewId, file: &FileId, current: Option<&PinnedHeading>) {
        self.current = Some(StatusEntry {
            view,
            file: file.clone(),
            heading: current.map(|pinned| StatusHeading {
                index: pinned.index(),
                level: pinned.level(),
                display_text: pinned.heading.display_text.clone(),
            }),
        });
    }

    /// Clear the indicator.
    pub fn hide(&mut self) {
        self.current = None;
    }

    /// Follow the `show_in_status_bar` setting.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the setting allows the indicator.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// What is shown, `None` when hidden or disabled.
    pub fn current(&self) -> Option<&StatusEntry> {
        self.current.as_ref().filter(|_| self.enabled)
    }

    /// Text for the status bar, e.g. `guide › Usage`.
    pub fn label(&self) -> Option<String> {
        let entry = self.current()?;
        let name = entry.file.name();
        Some(match &entry.heading {
            Some(heading) => format!("{name} › {}", heading.display_text),
            None => name,
        })
    }
}
