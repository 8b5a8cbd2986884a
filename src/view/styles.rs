//! Heading styling for the sticky block and status bar.

use crate::model::{HeadingLevel, HeadingStyle};
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether colours are enabled.
///
/// Disabled by `--no-color` or the `NO_COLOR` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Priority: `--no-color` flag, then `NO_COLOR`, then enabled.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Colours on.
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Whether colours are on.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== HeadingStyles =====

/// Per-level styles for pinned headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingStyles {
    colors: ColorConfig,
}

/// Background of the sticky block, so it reads as an overlay.
const BLOCK_BG: Color = Color::Rgb(40, 44, 52);

const LEVEL_COLORS: [Color; 6] = [
    Color::LightMagenta,
    Color::LightBlue,
    Color::LightCyan,
    Color::LightGreen,
    Color::LightYellow,
    Color::Gray,
];

impl HeadingStyles {
    /// Styles honouring `colors`.
    pub fn new(colors: ColorConfig) -> Self {
        Self { colors }
    }

    /// Row style for the whole block.
    pub fn block(&self) -> Style {
        if self.colors.colors_enabled() {
            Style::default().bg(BLOCK_BG)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    }

    /// Text style for a heading under the chosen visual style.
    pub fn heading(&self, level: HeadingLevel, style: HeadingStyle) -> Style {
        match style {
            HeadingStyle::Simple => Style::default(),
            HeadingStyle::Default => {
                let base = Style::default().add_modifier(Modifier::BOLD);
                if self.colors.colors_enabled() {
                    base.fg(LEVEL_COLORS[usize::from(level.get() - 1)])
                } else {
                    base
                }
            }
        }
    }

    /// Style of the `H1`..`H6` badge.
    pub fn indicator(&self) -> Style {
        if self.colors.colors_enabled() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    }

    /// Style of the file-name row.
    pub fn file_name(&self) -> Style {
        Style::default().add_modifier(Modifier::ITALIC)
    }
}

impl Default for HeadingStyles {
    fn default() -> Self {
        Self::new(ColorConfig::from_env_and_args(false))
    }
}
