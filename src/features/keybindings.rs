//! Customizable keyboard shortcuts
//!
//! Bindings are stored in the settings file and matched against crossterm key
//! events by the terminal shell.

use std::collections::HashMap;

use crossterm::event::{KeyCode as TermKey, KeyEvent, KeyModifiers, MediaKeyCode};
use serde::{Deserialize, Serialize};

/// All bindable actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Playback controls
    PlayPause,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,

    // Lyric strip
    CancelDrag,

    Quit,
}

impl Action {
    /// Get all available actions
    pub fn all() -> &'static [Action] {
        &[
            Action::PlayPause,
            Action::SeekForward,
            Action::SeekBackward,
            Action::VolumeUp,
            Action::VolumeDown,
            Action::CancelDrag,
            Action::Quit,
        ]
    }

    /// Get human-readable name for the action
    pub fn display_name(&self) -> &'static str {
        match self {
            Action::PlayPause => "play/pause",
            Action::SeekForward => "forward",
            Action::SeekBackward => "back",
            Action::VolumeUp => "vol+",
            Action::VolumeDown => "vol-",
            Action::CancelDrag => "cancel drag",
            Action::Quit => "quit",
        }
    }
}

/// A keyboard shortcut consisting of modifiers and a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Modifier keys (Ctrl, Alt, Shift)
    #[serde(default)]
    pub modifiers: ModifierSet,
    /// The main key
    pub key: KeyCode,
}

impl KeyBinding {
    /// Create a new keybinding
    pub fn new(key: KeyCode) -> Self {
        Self {
            modifiers: ModifierSet::default(),
            key,
        }
    }

    /// Add Ctrl modifier
    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Check if this keybinding matches the given key event
    ///
    /// Shift is ignored for characters, since it is part of producing them.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let ignore_shift = matches!(self.key, KeyCode::Char(_));
        self.key.matches(&event.code) && self.modifiers.matches(event.modifiers, ignore_shift)
    }

    /// Format as human-readable string
    pub fn display(&self) -> String {
        let mut parts = Vec::new();

        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }

        parts.push(self.key.display());
        parts.join("+")
    }
}

/// Set of modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ModifierSet {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

impl ModifierSet {
    /// Check if modifiers match
    pub fn matches(&self, modifiers: KeyModifiers, ignore_shift: bool) -> bool {
        self.ctrl == modifiers.contains(KeyModifiers::CONTROL)
            && self.alt == modifiers.contains(KeyModifiers::ALT)
            && (ignore_shift || self.shift == modifiers.contains(KeyModifiers::SHIFT))
    }
}

/// Supported key codes for binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    /// Printable character, matched case-insensitively
    Char(char),
    /// Function key F1..F12
    F(u8),

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,

    // Special
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,

    // Media keys
    MediaPlayPause,
}

impl KeyCode {
    /// Check if this key code matches a crossterm key
    pub fn matches(&self, key: &TermKey) -> bool {
        match (self, key) {
            (KeyCode::Space, TermKey::Char(' ')) => true,
            (KeyCode::Char(expected), TermKey::Char(c)) => {
                *c != ' ' && c.to_lowercase().eq(expected.to_lowercase())
            }
            (KeyCode::F(expected), TermKey::F(n)) => expected == n,
            (KeyCode::MediaPlayPause, TermKey::Media(media)) => matches!(
                media,
                MediaKeyCode::PlayPause | MediaKeyCode::Play | MediaKeyCode::Pause
            ),
            _ => matches!(
                (self, key),
                (KeyCode::Up, TermKey::Up)
                    | (KeyCode::Down, TermKey::Down)
                    | (KeyCode::Left, TermKey::Left)
                    | (KeyCode::Right, TermKey::Right)
                    | (KeyCode::Home, TermKey::Home)
                    | (KeyCode::End, TermKey::End)
                    | (KeyCode::PageUp, TermKey::PageUp)
                    | (KeyCode::PageDown, TermKey::PageDown)
                    | (KeyCode::Enter, TermKey::Enter)
                    | (KeyCode::Escape, TermKey::Esc)
                    | (KeyCode::Tab, TermKey::Tab)
                    | (KeyCode::Backspace, TermKey::Backspace)
            ),
        }
    }

    /// Get display name for the key
    pub fn display(&self) -> String {
        match self {
            KeyCode::Char(c) => c.to_uppercase().to_string(),
            KeyCode::F(n) => format!("F{}", n),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Space => "Space".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::MediaPlayPause => "Media Play".to_string(),
        }
    }
}

/// The keybindings configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Map from action to keybinding
    bindings: HashMap<Action, Vec<KeyBinding>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Playback
        bindings.insert(
            Action::PlayPause,
            vec![
                KeyBinding::new(KeyCode::Space),
                KeyBinding::new(KeyCode::MediaPlayPause),
            ],
        );
        bindings.insert(
            Action::SeekForward,
            vec![
                KeyBinding::new(KeyCode::Right),
                KeyBinding::new(KeyCode::Char('l')),
            ],
        );
        bindings.insert(
            Action::SeekBackward,
            vec![
                KeyBinding::new(KeyCode::Left),
                KeyBinding::new(KeyCode::Char('h')),
            ],
        );
        bindings.insert(
            Action::VolumeUp,
            vec![
                KeyBinding::new(KeyCode::Up),
                KeyBinding::new(KeyCode::Char('+')),
            ],
        );
        bindings.insert(
            Action::VolumeDown,
            vec![
                KeyBinding::new(KeyCode::Down),
                KeyBinding::new(KeyCode::Char('-')),
            ],
        );

        // Lyric strip
        bindings.insert(Action::CancelDrag, vec![KeyBinding::new(KeyCode::Escape)]);

        bindings.insert(
            Action::Quit,
            vec![
                KeyBinding::new(KeyCode::Char('q')),
                KeyBinding::new(KeyCode::Char('c')).ctrl(),
            ],
        );

        Self { bindings }
    }
}

impl KeyBindings {
    /// Find the action that matches the given key event
    pub fn find_action(&self, event: &KeyEvent) -> Option<Action> {
        // Iterate in a fixed order so overlapping bindings resolve the same way
        Action::all().iter().copied().find(|action| {
            self.bindings
                .get(action)
                .is_some_and(|bindings| bindings.iter().any(|b| b.matches(event)))
        })
    }

    /// Get display string for an action's keybinding
    pub fn display_for_action(&self, action: &Action) -> String {
        self.bindings
            .get(action)
            .and_then(|b| b.first())
            .map(|b| b.display())
            .unwrap_or_else(|| "None".to_string())
    }

    /// One-line summary like `Space play/pause  ← back`
    pub fn help_line(&self) -> String {
        Action::all()
            .iter()
            .filter(|action| self.bindings.contains_key(*action))
            .map(|action| {
                format!(
                    "{} {}",
                    self.display_for_action(action),
                    action.display_name()
                )
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: TermKey, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        for action in Action::all() {
            assert_ne!(bindings.display_for_action(action), "None", "{:?}", action);
        }
    }

    #[test]
    fn test_find_action() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.find_action(&key(TermKey::Char(' '), KeyModifiers::NONE)),
            Some(Action::PlayPause)
        );
        assert_eq!(
            bindings.find_action(&key(TermKey::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(
            bindings.find_action(&key(TermKey::Char('c'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            bindings.find_action(&key(TermKey::Esc, KeyModifiers::NONE)),
            Some(Action::CancelDrag)
        );
    }

    #[test]
    fn test_char_ignores_shift_and_case() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.find_action(&key(TermKey::Char('Q'), KeyModifiers::SHIFT)),
            Some(Action::Quit)
        );
        assert_eq!(
            bindings.find_action(&key(TermKey::Char('+'), KeyModifiers::SHIFT)),
            Some(Action::VolumeUp)
        );
        // Named keys still compare shift
        assert_eq!(
            bindings.find_action(&key(TermKey::Right, KeyModifiers::SHIFT)),
            None
        );
    }

    #[test]
    fn test_keybinding_display() {
        let binding = KeyBinding::new(KeyCode::Char('p')).ctrl();
        assert_eq!(binding.display(), "Ctrl+P");
        assert_eq!(KeyBinding::new(KeyCode::F(5)).display(), "F5");
    }

    #[test]
    fn test_serde_roundtrip() {
        let bindings = KeyBindings::default();
        let json = serde_json::to_string(&bindings).unwrap();
        let back: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bindings);
    }
}
