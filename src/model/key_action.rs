//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll the focused view up by one line. Default: k/↑
    ScrollUp,
    /// Scroll the focused view down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page height. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to top of the document. Default: g/Home
    ScrollToTop,
    /// Jump to bottom of the document. Default: G/End
    ScrollToBottom,

    // Views
    /// Focus the next view. Default: Tab
    NextView,
    /// Open another view of the focused document. Default: v
    SplitView,
    /// Close the focused view. Default: x
    CloseView,
    /// Cycle the focused view through source, live preview and reading. Default: e
    CycleEditMode,

    // Navigation
    /// Open the quick-navigation heading picker. Default: o
    OpenNavigator,
    /// Jump to the current pinned heading. Default: Enter
    JumpToCurrent,

    // Settings surface
    /// Toggle default/concise display mode. Default: m
    ToggleMode,
    /// Raise the pinned heading cap by one. Default: +
    IncreaseMax,
    /// Lower the pinned heading cap by one (0 = unlimited). Default: -
    DecreaseMax,
    /// Toggle level indicators. Default: i
    ToggleIndicators,
    /// Toggle simple/default style. Default: s
    ToggleStyle,
    /// Toggle the status bar indicator. Default: b
    ToggleStatusBar,
    /// Toggle instant/animated jumps. Default: a
    ToggleScrollBehaviour,
    /// Toggle automatic file name display. Default: f
    ToggleFileName,

    // Application
    /// Quit. Default: q/Ctrl+c
    Quit,
}

impl KeyAction {
    /// Whether the action scrolls the focused view.
    pub fn is_scroll(&self) -> bool {
        matches!(
            self,
            Self::ScrollUp
                | Self::ScrollDown
                | Self::PageUp
                | Self::PageDown
                | Self::ScrollToTop
                | Self::ScrollToBottom
        )
    }

    /// Whether the action changes a setting.
    pub fn is_setting(&self) -> bool {
        matches!(
            self,
            Self::ToggleMode
                | Self::IncreaseMax
                | Self::DecreaseMax
                | Self::ToggleIndicators
                | Self::ToggleStyle
                | Self::ToggleStatusBar
                | Self::ToggleScrollBehaviour
                | Self::ToggleFileName
        )
    }
}
