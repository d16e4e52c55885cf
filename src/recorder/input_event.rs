use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Global screen coordinate.
    pub point: Point,
    pub button: MouseButton,
    /// True for button-down, false for button-up.
    pub pressed: bool,
    pub timestamp_ms: i64,
}

impl ClickEvent {
    pub fn new(x: i32, y: i32, button: MouseButton, pressed: bool) -> Self {
        Self {
            point: Point::new(x, y),
            button,
            pressed,
            timestamp_ms: now_ms(),
        }
    }

    pub fn press(x: i32, y: i32) -> Self {
        Self::new(x, y, MouseButton::Left, true)
    }
}

/// Keys that do not produce a printable character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyName {
    Enter,
    Backspace,
    Space,
    Tab,
    Escape,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Shift,
    Control,
    Alt,
    Meta,
    CapsLock,
    Function(u8),
    Other(String),
}

impl KeyName {
    /// Modifiers arrive together with the characters they modify and carry no
    /// meaning on their own.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeyName::Shift | KeyName::Control | KeyName::Alt | KeyName::Meta | KeyName::CapsLock
        )
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyName::Enter => write!(f, "Enter"),
            KeyName::Backspace => write!(f, "Backspace"),
            KeyName::Space => write!(f, "Space"),
            KeyName::Tab => write!(f, "Tab"),
            KeyName::Escape => write!(f, "Escape"),
            KeyName::Delete => write!(f, "Delete"),
            KeyName::Up => write!(f, "Up"),
            KeyName::Down => write!(f, "Down"),
            KeyName::Left => write!(f, "Left"),
            KeyName::Right => write!(f, "Right"),
            KeyName::Home => write!(f, "Home"),
            KeyName::End => write!(f, "End"),
            KeyName::PageUp => write!(f, "Page Up"),
            KeyName::PageDown => write!(f, "Page Down"),
            KeyName::Shift => write!(f, "Shift"),
            KeyName::Control => write!(f, "Ctrl"),
            KeyName::Alt => write!(f, "Alt"),
            KeyName::Meta => write!(f, "Meta"),
            KeyName::CapsLock => write!(f, "Caps Lock"),
            KeyName::Function(n) => write!(f, "F{n}"),
            KeyName::Other(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Named(KeyName),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Click(ClickEvent),
    KeyDown(Key),
}

pub(crate) fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
