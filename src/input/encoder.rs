//! Default keyboard encoder
//!
//! Encodes keys the way xterm does: cursor and editing keys become CSI or
//! SS3 sequences (with a modifier parameter when Shift, Alt or Ctrl is
//! held), and modified characters become C0 codes or ESC-prefixed text.

use super::{vk, ControlKeyStates, KeyEvent, KeyboardEncoder};

/// Keyboard modifiers relevant to encoding
#[derive(Debug, Clone, Copy, Default)]
struct Modifiers {
    shift: bool,
    ctrl: bool,
    alt: bool,
}

impl From<ControlKeyStates> for Modifiers {
    fn from(states: ControlKeyStates) -> Self {
        Self {
            shift: states.is_shift_pressed(),
            ctrl: states.is_ctrl_pressed(),
            alt: states.is_alt_pressed(),
        }
    }
}

impl Modifiers {
    /// Modifier parameter for CSI sequences (1 + bitmask)
    /// Shift=1, Alt=2, Ctrl=4
    fn as_csi_param(&self) -> u8 {
        let mut param = 1;
        if self.shift {
            param += 1;
        }
        if self.alt {
            param += 2;
        }
        if self.ctrl {
            param += 4;
        }
        param
    }

    fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Keys with a dedicated encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    /// F1 through F12
    Function(u8),
    Backspace,
    Tab,
    Enter,
    Escape,
    KeypadEnter,
    KeypadPlus,
    KeypadMinus,
    KeypadMultiply,
    KeypadDivide,
    KeypadDecimal,
    /// Keypad digit 0 through 9
    KeypadDigit(u8),
}

impl Key {
    fn from_virtual_key(virtual_key: u16, states: ControlKeyStates) -> Option<Self> {
        let key = match virtual_key {
            vk::UP => Key::Up,
            vk::DOWN => Key::Down,
            vk::LEFT => Key::Left,
            vk::RIGHT => Key::Right,
            vk::HOME => Key::Home,
            vk::END => Key::End,
            vk::PRIOR => Key::PageUp,
            vk::NEXT => Key::PageDown,
            vk::INSERT => Key::Insert,
            vk::DELETE => Key::Delete,
            vk::F1..=vk::F12 => Key::Function((virtual_key - vk::F1 + 1) as u8),
            vk::BACK => Key::Backspace,
            vk::TAB => Key::Tab,
            vk::RETURN if states.contains(ControlKeyStates::ENHANCED_KEY) => Key::KeypadEnter,
            vk::RETURN => Key::Enter,
            vk::ESCAPE => Key::Escape,
            vk::ADD => Key::KeypadPlus,
            vk::SUBTRACT => Key::KeypadMinus,
            vk::MULTIPLY => Key::KeypadMultiply,
            vk::DIVIDE => Key::KeypadDivide,
            vk::DECIMAL => Key::KeypadDecimal,
            vk::NUMPAD0..=vk::NUMPAD9 => Key::KeypadDigit((virtual_key - vk::NUMPAD0) as u8),
            _ => return None,
        };
        Some(key)
    }
}

/// xterm-style keyboard encoder
#[derive(Debug, Clone, Default)]
pub struct TerminalInput {
    application_cursor: bool,
    application_keypad: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn application_cursor(&self) -> bool {
        self.application_cursor
    }

    pub fn application_keypad(&self) -> bool {
        self.application_keypad
    }

    fn encode_key(&self, key: Key, modifiers: Modifiers) -> String {
        match key {
            Key::Up => self.encode_cursor_key('A', modifiers),
            Key::Down => self.encode_cursor_key('B', modifiers),
            Key::Right => self.encode_cursor_key('C', modifiers),
            Key::Left => self.encode_cursor_key('D', modifiers),

            Key::Home => encode_tilde_key(1, modifiers),
            Key::Insert => encode_tilde_key(2, modifiers),
            Key::Delete => encode_tilde_key(3, modifiers),
            Key::End => encode_tilde_key(4, modifiers),
            Key::PageUp => encode_tilde_key(5, modifiers),
            Key::PageDown => encode_tilde_key(6, modifiers),

            Key::Function(n @ 1..=4) => {
                let code = char::from(b'P' + (n - 1));
                if modifiers.any() {
                    format!("\x1b[1;{}{}", modifiers.as_csi_param(), code)
                } else {
                    format!("\x1bO{code}")
                }
            }
            Key::Function(n) => {
                let number = match n {
                    5 => 15,
                    6 => 17,
                    7 => 18,
                    8 => 19,
                    9 => 20,
                    10 => 21,
                    11 => 23,
                    _ => 24,
                };
                encode_tilde_key(number, modifiers)
            }

            Key::Backspace => {
                if modifiers.ctrl {
                    "\x08".to_string()
                } else if modifiers.alt {
                    "\x1b\x7f".to_string()
                } else {
                    "\x7f".to_string()
                }
            }
            Key::Tab => {
                if modifiers.shift {
                    "\x1b[Z".to_string()
                } else {
                    "\t".to_string()
                }
            }
            Key::Enter => {
                if modifiers.alt {
                    "\x1b\r".to_string()
                } else {
                    "\r".to_string()
                }
            }
            Key::Escape => "\x1b".to_string(),

            Key::KeypadEnter => self.encode_keypad('M', "\r"),
            Key::KeypadPlus => self.encode_keypad('k', "+"),
            Key::KeypadMinus => self.encode_keypad('m', "-"),
            Key::KeypadMultiply => self.encode_keypad('j', "*"),
            Key::KeypadDivide => self.encode_keypad('o', "/"),
            Key::KeypadDecimal => self.encode_keypad('n', "."),
            Key::KeypadDigit(d) => {
                let app_code = char::from(b'p' + d);
                let digit = char::from(b'0' + d).to_string();
                self.encode_keypad(app_code, &digit)
            }
        }
    }

    /// Arrow keys: CSI in normal mode, SS3 in application mode
    fn encode_cursor_key(&self, code: char, modifiers: Modifiers) -> String {
        if modifiers.any() {
            format!("\x1b[1;{}{}", modifiers.as_csi_param(), code)
        } else if self.application_cursor {
            format!("\x1bO{code}")
        } else {
            format!("\x1b[{code}")
        }
    }

    fn encode_keypad(&self, app_code: char, normal: &str) -> String {
        if self.application_keypad {
            format!("\x1bO{app_code}")
        } else {
            normal.to_string()
        }
    }
}

/// Home, End, PgUp, PgDn, Insert, Delete, F5-F12
fn encode_tilde_key(number: u8, modifiers: Modifiers) -> String {
    if modifiers.any() {
        format!("\x1b[{};{}~", number, modifiers.as_csi_param())
    } else {
        format!("\x1b[{number}~")
    }
}

/// A character typed with Ctrl and/or Alt held
fn encode_modified_char(c: char, modifiers: Modifiers) -> String {
    let c = if modifiers.ctrl {
        match c {
            'a'..='z' | 'A'..='Z' => char::from(c.to_ascii_uppercase() as u8 - b'@'),
            ' ' | '@' | '2' => '\0',
            _ => c,
        }
    } else {
        c
    };

    if modifiers.alt {
        format!("\x1b{c}")
    } else {
        c.to_string()
    }
}

impl KeyboardEncoder for TerminalInput {
    fn handle_key(&mut self, event: &KeyEvent, sink: &mut dyn FnMut(&str)) -> bool {
        if !event.is_key_down() {
            return false;
        }
        let modifiers = Modifiers::from(event.states());

        let encoded = match Key::from_virtual_key(event.virtual_key(), event.states()) {
            Some(key) => self.encode_key(key, modifiers),
            None => match event.character() {
                Some(c) if modifiers.ctrl || modifiers.alt => encode_modified_char(c, modifiers),
                // Plain characters arrive as character events
                _ => return false,
            },
        };

        for _ in 0..event.repeat_count().max(1) {
            sink(&encoded);
        }
        true
    }

    fn handle_char(&mut self, ch: char, sink: &mut dyn FnMut(&str)) -> bool {
        if ch == '\0' {
            return false;
        }
        let mut buf = [0u8; 4];
        sink(ch.encode_utf8(&mut buf));
        true
    }

    fn set_cursor_keys_mode(&mut self, application: bool) {
        self.application_cursor = application;
    }

    fn set_keypad_mode(&mut self, application: bool) {
        self.application_keypad = application;
    }
}
