use std::fmt;

use super::input_event::{Key, KeyName};

/// "Pressed: <key>" line written straight to the document, independent of
/// the typed-text buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMarker(pub String);

impl fmt::Display for KeyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pressed: {}", self.0)
    }
}

/// What the orchestrator has to write after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEffect {
    /// The key only changed the pending buffer.
    Buffered,
    /// Enter: the drained buffer (possibly empty) plus the Enter marker.
    Submitted { typed: String, marker: KeyMarker },
    Marker(KeyMarker),
    Ignored,
}

/// Printable keystrokes waiting for the next flush point.
#[derive(Debug, Default, Clone)]
pub struct TypedTextBuffer {
    accumulated: String,
}

impl TypedTextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_char(&mut self, c: char) {
        self.accumulated.push(c);
    }

    /// No-op on an empty buffer.
    pub fn on_backspace(&mut self) {
        self.accumulated.pop();
    }

    pub fn on_space(&mut self) {
        self.accumulated.push(' ');
    }

    pub fn on_special_key(&self, name: &KeyName) -> KeyMarker {
        KeyMarker(name.to_string())
    }

    /// Drain everything typed so far.
    pub fn flush(&mut self) -> String {
        std::mem::take(&mut self.accumulated)
    }

    pub fn is_empty(&self) -> bool {
        self.accumulated.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accumulated.chars().count()
    }

    pub fn peek(&self) -> &str {
        &self.accumulated
    }

    /// Route one key press.
    pub fn apply(&mut self, key: &Key) -> KeyEffect {
        match key {
            Key::Char(c) if c.is_control() => KeyEffect::Ignored,
            Key::Char(c) => {
                self.on_char(*c);
                KeyEffect::Buffered
            }
            Key::Named(KeyName::Space) => {
                self.on_space();
                KeyEffect::Buffered
            }
            Key::Named(KeyName::Backspace) => {
                self.on_backspace();
                KeyEffect::Buffered
            }
            Key::Named(KeyName::Enter) => KeyEffect::Submitted {
                typed: self.flush(),
                marker: self.on_special_key(&KeyName::Enter),
            },
            Key::Named(name) if name.is_modifier() => KeyEffect::Ignored,
            Key::Named(name) => KeyEffect::Marker(self.on_special_key(name)),
        }
    }
}
