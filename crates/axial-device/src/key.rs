use std::fmt;
use std::str::FromStr;

use crate::DeviceError;

/// A keyboard key that can drive a logical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Printable key: lowercase letter, digit or punctuation.
    Char(char),
    Space,
    Return,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    LeftMeta,
    RightMeta,
    CapsLock,
    /// Function key `F1`..`F24`.
    F(u8),
    /// Numeric keypad digit.
    Keypad(u8),
    KeypadPlus,
    KeypadMinus,
    KeypadMultiply,
    KeypadDivide,
    KeypadEnter,
    KeypadPeriod,
}

/// Parse a key name into a `KeyCode`.
///
/// Accepts both profile spellings (`arrow_up`, `ctrl`) and backend key names
/// after normalization (`Left Shift` -> `left_shift`, `Keypad 1` -> `keypad_1`).
pub(crate) fn parse_key(input: &str) -> Option<KeyCode> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (None, _) => return None,
        (Some(ch), None) if ch.is_ascii_graphic() => {
            return Some(KeyCode::Char(ch.to_ascii_lowercase()));
        }
        _ => {}
    }

    let normalized = trimmed.to_lowercase().replace([' ', '-'], "_");
    let name = normalized.as_str();

    if let Some(rest) = name.strip_prefix('f') {
        if let Ok(n) = rest.parse::<u8>() {
            if (1..=24).contains(&n) {
                return Some(KeyCode::F(n));
            }
        }
    }

    for prefix in ["keypad_", "kp_"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if let Ok(n) = rest.parse::<u8>() {
                if n <= 9 {
                    return Some(KeyCode::Keypad(n));
                }
            }
        }
    }

    Some(match name {
        // Modifiers
        "shift" | "left_shift" | "lshift" => KeyCode::LeftShift,
        "right_shift" | "rshift" => KeyCode::RightShift,
        "ctrl" | "control" | "left_ctrl" | "left_control" | "lctrl" => {
            KeyCode::LeftControl
        }
        "right_ctrl" | "right_control" | "rctrl" => KeyCode::RightControl,
        "alt" | "option" | "left_alt" | "lalt" => KeyCode::LeftAlt,
        "right_alt" | "ralt" | "alt_gr" => KeyCode::RightAlt,
        "meta" | "cmd" | "command" | "super" | "left_gui" | "left_meta" => {
            KeyCode::LeftMeta
        }
        "rmeta" | "rcmd" | "right_gui" | "right_meta" => KeyCode::RightMeta,
        "caps_lock" | "capslock" => KeyCode::CapsLock,

        // Navigation
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "page_up" | "pageup" => KeyCode::PageUp,
        "page_down" | "pagedown" => KeyCode::PageDown,
        "arrow_up" | "up" => KeyCode::UpArrow,
        "arrow_down" | "down" => KeyCode::DownArrow,
        "arrow_left" | "left" => KeyCode::LeftArrow,
        "arrow_right" | "right" => KeyCode::RightArrow,

        // Actions
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "backspace" => KeyCode::Backspace,
        "escape" | "esc" => KeyCode::Escape,
        "tab" => KeyCode::Tab,
        "space" | "spacebar" => KeyCode::Space,
        "enter" | "return" => KeyCode::Return,

        // Keypad operators
        "keypad_plus" | "kp_plus" | "keypad_+" => KeyCode::KeypadPlus,
        "keypad_minus" | "kp_minus" | "keypad__" => KeyCode::KeypadMinus,
        "keypad_multiply" | "kp_multiply" | "keypad_*" => KeyCode::KeypadMultiply,
        "keypad_divide" | "kp_divide" | "keypad_/" => KeyCode::KeypadDivide,
        "keypad_enter" | "kp_enter" => KeyCode::KeypadEnter,
        "keypad_period" | "kp_decimal" | "keypad_." => KeyCode::KeypadPeriod,

        // Named punctuation
        "quote" | "apostrophe" => KeyCode::Char('\''),
        "semicolon" => KeyCode::Char(';'),
        "backslash" => KeyCode::Char('\\'),
        "grave" | "backtick" | "tilde" => KeyCode::Char('`'),
        "period" | "dot" => KeyCode::Char('.'),
        "comma" => KeyCode::Char(','),
        "slash" => KeyCode::Char('/'),
        "minus" => KeyCode::Char('-'),
        "equal" | "equals" => KeyCode::Char('='),
        "left_bracket" => KeyCode::Char('['),
        "right_bracket" => KeyCode::Char(']'),
        _ => return None,
    })
}

impl KeyCode {
    /// Canonical name, accepted back by [`KeyCode::from_str`].
    pub fn name(&self) -> String {
        match self {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(ch) => ch.to_string(),
            KeyCode::F(n) => format!("f{n}"),
            KeyCode::Keypad(n) => format!("keypad_{n}"),
            other => other.static_name().to_string(),
        }
    }

    fn static_name(&self) -> &'static str {
        match self {
            KeyCode::Space => "space",
            KeyCode::Return => "return",
            KeyCode::Escape => "escape",
            KeyCode::Tab => "tab",
            KeyCode::Backspace => "backspace",
            KeyCode::Delete => "delete",
            KeyCode::Insert => "insert",
            KeyCode::Home => "home",
            KeyCode::End => "end",
            KeyCode::PageUp => "page_up",
            KeyCode::PageDown => "page_down",
            KeyCode::UpArrow => "arrow_up",
            KeyCode::DownArrow => "arrow_down",
            KeyCode::LeftArrow => "arrow_left",
            KeyCode::RightArrow => "arrow_right",
            KeyCode::LeftShift => "left_shift",
            KeyCode::RightShift => "right_shift",
            KeyCode::LeftControl => "left_ctrl",
            KeyCode::RightControl => "right_ctrl",
            KeyCode::LeftAlt => "left_alt",
            KeyCode::RightAlt => "right_alt",
            KeyCode::LeftMeta => "left_meta",
            KeyCode::RightMeta => "right_meta",
            KeyCode::CapsLock => "caps_lock",
            KeyCode::KeypadPlus => "keypad_plus",
            KeyCode::KeypadMinus => "keypad_minus",
            KeyCode::KeypadMultiply => "keypad_multiply",
            KeyCode::KeypadDivide => "keypad_divide",
            KeyCode::KeypadEnter => "keypad_enter",
            KeyCode::KeypadPeriod => "keypad_period",
            KeyCode::Char(_) | KeyCode::F(_) | KeyCode::Keypad(_) => "",
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for KeyCode {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s).ok_or_else(|| DeviceError::InvalidKey(s.to_string()))
    }
}
