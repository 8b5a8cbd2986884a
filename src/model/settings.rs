//! User-facing settings record.
//!
//! Global, mutated only through the settings surface, read by every view's
//! renderer. Persisted as a flat TOML bag by [`crate::config`].

use crate::model::KeyAction;
use serde::{Deserialize, Serialize};

/// Which headings the sticky block shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Ancestor chain plus the earlier siblings of each ancestor.
    #[default]
    Default,
    /// Ancestor chain only, one heading per level.
    Concise,
}

impl DisplayMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Default => Self::Concise,
            Self::Concise => Self::Default,
        }
    }
}

/// Visual treatment of pinned headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// Plain text.
    Simple,
    /// Styled like the document's own headings, per level.
    #[default]
    Default,
}

impl HeadingStyle {
    /// The other style.
    pub fn toggled(self) -> Self {
        match self {
            Self::Simple => Self::Default,
            Self::Default => Self::Simple,
        }
    }
}

/// How jump-to-heading scrolls the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehaviour {
    /// Jump directly.
    #[default]
    Instant,
    /// Eased animation.
    Animated,
}

impl ScrollBehaviour {
    /// The other behaviour.
    pub fn toggled(self) -> Self {
        match self {
            Self::Instant => Self::Animated,
            Self::Animated => Self::Instant,
        }
    }
}

/// Which surface of a view is showing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditMode {
    /// Raw source editing.
    Source,
    /// Editing with inline rendering.
    #[default]
    LivePreview,
    /// Read-only rendered view.
    Reading,
}

/// Sticky headings settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Display policy.
    pub mode: DisplayMode,
    /// Cap on pinned headings, 0 = unlimited.
    pub max: usize,
    /// Show a level badge before each pinned heading.
    pub indicators: bool,
    /// Visual style.
    pub style: HeadingStyle,
    /// Show the current section in the status bar.
    pub show_in_status_bar: bool,
    /// Jump-to-heading scroll behaviour.
    pub scroll_behaviour: ScrollBehaviour,
    /// Show the file name above the pinned headings when it is not otherwise visible.
    pub auto_show_file_name: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Default,
            max: 0,
            indicators: true,
            style: HeadingStyle::Default,
            show_in_status_bar: true,
            scroll_behaviour: ScrollBehaviour::Instant,
            auto_show_file_name: false,
        }
    }
}

impl Settings {
    /// Settings after applying a settings-surface action.
    ///
    /// Returns `None` for actions that do not touch settings. The cap never
    /// drops below 0, which means unlimited.
    pub fn with_action(&self, action: KeyAction) -> Option<Settings> {
        let mut next = self.clone();
        match action {
            KeyAction::ToggleMode => next.mode = next.mode.toggled(),
            KeyAction::IncreaseMax => next.max = next.max.saturating_add(1),
            KeyAction::DecreaseMax => next.max = next.max.saturating_sub(1),
            KeyAction::ToggleIndicators => next.indicators = !next.indicators,
            KeyAction::ToggleStyle => next.style = next.style.toggled(),
            KeyAction::ToggleStatusBar => next.show_in_status_bar = !next.show_in_status_bar,
            KeyAction::ToggleScrollBehaviour => {
                next.scroll_behaviour = next.scroll_behaviour.toggled()
            }
            KeyAction::ToggleFileName => next.auto_show_file_name = !next.auto_show_file_name,
            _ => return None,
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unlimited_default_mode() {
        let settings = Settings::default();
        assert_eq!(settings.mode, DisplayMode::Default);
        assert_eq!(settings.max, 0);
        assert!(settings.show_in_status_bar);
        assert_eq!(settings.scroll_behaviour, ScrollBehaviour::Instant);
    }

    #[test]
    fn toggles_flip_between_variants() {
        assert_eq!(DisplayMode::Default.toggled(), DisplayMode::Concise);
        assert_eq!(DisplayMode::Concise.toggled(), DisplayMode::Default);
        assert_eq!(HeadingStyle::Simple.toggled(), HeadingStyle::Default);
        assert_eq!(ScrollBehaviour::Animated.toggled(), ScrollBehaviour::Instant);
    }

    #[test]
    fn enums_serialize_lowercase() {
        let encoded = toml::to_string(&Settings::default()).unwrap();
        assert!(encoded.contains("mode = \"default\""), "{encoded}");
        assert!(encoded.contains("scroll_behaviour = \"instant\""), "{encoded}");
    }

    #[test]
    fn with_action_applies_settings_actions() {
        let settings = Settings::default();
        let concise = settings.with_action(KeyAction::ToggleMode).unwrap();
        assert_eq!(concise.mode, DisplayMode::Concise);
        assert_eq!(
            settings.with_action(KeyAction::IncreaseMax).unwrap().max,
            1
        );
        assert!(!settings.with_action(KeyAction::ToggleIndicators).unwrap().indicators);
        assert!(
            settings
                .with_action(KeyAction::ToggleFileName)
                .unwrap()
                .auto_show_file_name
        );
    }

    #[test]
    fn decrease_max_stops_at_unlimited() {
        let settings = Settings::default();
        assert_eq!(settings.with_action(KeyAction::DecreaseMax).unwrap().max, 0);
    }

    #[test]
    fn non_setting_actions_are_ignored() {
        assert_eq!(Settings::default().with_action(KeyAction::ScrollDown), None);
        assert_eq!(Settings::default().with_action(KeyAction::Quit), None);
    }
}
