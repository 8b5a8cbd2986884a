//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Provides vim-style defaults alongside arrow and page keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Key events carry press/release metadata that the table ignores, so
    /// lookup is by code and modifiers only.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use KeyCode::{Char, Down, End, Enter, Home, PageDown, PageUp, Tab, Up};
        const NONE: KeyModifiers = KeyModifiers::NONE;

        let mut keys = Self {
            bindings: HashMap::new(),
        };

        // Scrolling
        keys.bind(Char('j'), NONE, KeyAction::ScrollDown);
        keys.bind(Down, NONE, KeyAction::ScrollDown);
        keys.bind(Char('k'), NONE, KeyAction::ScrollUp);
        keys.bind(Up, NONE, KeyAction::ScrollUp);
        keys.bind(Char('d'), KeyModifiers::CONTROL, KeyAction::PageDown);
        keys.bind(PageDown, NONE, KeyAction::PageDown);
        keys.bind(Char('u'), KeyModifiers::CONTROL, KeyAction::PageUp);
        keys.bind(PageUp, NONE, KeyAction::PageUp);
        keys.bind(Char('g'), NONE, KeyAction::ScrollToTop);
        keys.bind(Home, NONE, KeyAction::ScrollToTop);
        keys.bind(Char('G'), KeyModifiers::SHIFT, KeyAction::ScrollToBottom);
        keys.bind(End, NONE, KeyAction::ScrollToBottom);

        // Views
        keys.bind(Tab, NONE, KeyAction::NextView);
        keys.bind(Char('v'), NONE, KeyAction::SplitView);
        keys.bind(Char('x'), NONE, KeyAction::CloseView);
        keys.bind(Char('e'), NONE, KeyAction::CycleEditMode);

        // Navigation
        keys.bind(Char('o'), NONE, KeyAction::OpenNavigator);
        keys.bind(Enter, NONE, KeyAction::JumpToCurrent);

        // Settings
        keys.bind(Char('m'), NONE, KeyAction::ToggleMode);
        keys.bind(Char('+'), NONE, KeyAction::IncreaseMax);
        keys.bind(Char('+'), KeyModifiers::SHIFT, KeyAction::IncreaseMax);
        keys.bind(Char('-'), NONE, KeyAction::DecreaseMax);
        keys.bind(Char('i'), NONE, KeyAction::ToggleIndicators);
        keys.bind(Char('s'), NONE, KeyAction::ToggleStyle);
        keys.bind(Char('b'), NONE, KeyAction::ToggleStatusBar);
        keys.bind(Char('a'), NONE, KeyAction::ToggleScrollBehaviour);
        keys.bind(Char('f'), NONE, KeyAction::ToggleFileName);

        // Application
        keys.bind(Char('q'), NONE, KeyAction::Quit);
        keys.bind(Char('c'), KeyModifiers::CONTROL, KeyAction::Quit);

        keys
    }
}
