//! Keybinding registry: maps key events to actions per view.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Refresh,
    ToggleSettings,
    OpenInBrowser,
    ToggleCategory,
}

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    News,
    Settings,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Context-aware key lookup. The same key can mean different things in the
/// news and settings views; unbound keys fall back to `Context::Global`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
    }

    fn register_defaults(&mut self) {
        use KeyCode::{Char, Down, Enter, Up};

        // Both views
        self.bind(Context::Global, KeySpec::plain(Char('q')), Action::Quit);
        self.bind(Context::Global, KeySpec::ctrl('c'), Action::Quit);
        self.bind(Context::Global, KeySpec::plain(Char('j')), Action::NavDown);
        self.bind(Context::Global, KeySpec::plain(Down), Action::NavDown);
        self.bind(Context::Global, KeySpec::plain(Char('k')), Action::NavUp);
        self.bind(Context::Global, KeySpec::plain(Up), Action::NavUp);
        self.bind(Context::Global, KeySpec::plain(Char('r')), Action::Refresh);
        self.bind(
            Context::Global,
            KeySpec::plain(Char('s')),
            Action::ToggleSettings,
        );

        // News view
        self.bind(Context::News, KeySpec::plain(Enter), Action::OpenInBrowser);
        self.bind(
            Context::News,
            KeySpec::plain(Char('o')),
            Action::OpenInBrowser,
        );

        // Settings view
        self.bind(
            Context::Settings,
            KeySpec::plain(Char(' ')),
            Action::ToggleCategory,
        );
        self.bind(
            Context::Settings,
            KeySpec::plain(Enter),
            Action::ToggleCategory,
        );
        self.bind(
            Context::Settings,
            KeySpec::plain(KeyCode::Esc),
            Action::ToggleSettings,
        );
    }

    /// Look up the action for a key, trying `context` before `Global`.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
