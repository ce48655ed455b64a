//! US keyboard layout
//!
//! Resolves virtual keys to characters for a US QWERTY keyboard. Used when
//! the terminal has to synthesize the character of an Alt-modified key.

use super::{vk, ControlKeyStates, KeyboardLayout};

/// Unshifted and shifted characters of the OEM punctuation keys
const OEM_KEYS: [(u16, char, char, u16); 11] = [
    (vk::OEM_1, ';', ':', 0x27),
    (vk::OEM_PLUS, '=', '+', 0x0D),
    (vk::OEM_COMMA, ',', '<', 0x33),
    (vk::OEM_MINUS, '-', '_', 0x0C),
    (vk::OEM_PERIOD, '.', '>', 0x34),
    (vk::OEM_2, '/', '?', 0x35),
    (vk::OEM_3, '`', '~', 0x29),
    (vk::OEM_4, '[', '{', 0x1A),
    (vk::OEM_5, '\\', '|', 0x2B),
    (vk::OEM_6, ']', '}', 0x1B),
    (vk::OEM_7, '\'', '"', 0x28),
];

/// Shifted digits, indexed by digit
const SHIFTED_DIGITS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

/// Scan codes of the letters A through Z
const LETTER_SCAN_CODES: [u16; 26] = [
    0x1E, 0x30, 0x2E, 0x20, 0x12, 0x21, 0x22, 0x23, 0x17, 0x24, 0x25, 0x26, 0x32, 0x31, 0x18,
    0x19, 0x10, 0x13, 0x1F, 0x14, 0x16, 0x2F, 0x11, 0x2D, 0x15, 0x2C,
];

/// US QWERTY layout
#[derive(Debug, Clone, Copy, Default)]
pub struct UsLayout;

impl UsLayout {
    pub fn new() -> Self {
        Self
    }
}

impl KeyboardLayout for UsLayout {
    fn to_unicode(&self, virtual_key: u16, _scan_code: u16, states: ControlKeyStates) -> Option<char> {
        let shift = states.is_shift_pressed();
        match virtual_key {
            0x41..=0x5A => {
                let upper = char::from(virtual_key as u8);
                if states.is_ctrl_pressed() {
                    return Some(char::from(virtual_key as u8 - b'@'));
                }
                let caps = states.contains(ControlKeyStates::CAPSLOCK);
                Some(if shift != caps { upper } else { upper.to_ascii_lowercase() })
            }
            0x30..=0x39 => {
                let digit = usize::from(virtual_key - 0x30);
                Some(if shift {
                    SHIFTED_DIGITS[digit]
                } else {
                    char::from(virtual_key as u8)
                })
            }
            vk::SPACE => Some(' '),
            vk::RETURN => Some('\r'),
            vk::TAB => Some('\t'),
            vk::BACK => Some('\x08'),
            vk::ESCAPE => Some('\x1b'),
            _ => OEM_KEYS
                .iter()
                .find(|(key, ..)| *key == virtual_key)
                .map(|&(_, plain, shifted, _)| if shift { shifted } else { plain }),
        }
    }

    fn scan_code_from_virtual_key(&self, virtual_key: u16) -> u16 {
        match virtual_key {
            0x41..=0x5A => LETTER_SCAN_CODES[usize::from(virtual_key - 0x41)],
            0x31..=0x39 => virtual_key - 0x31 + 0x02,
            0x30 => 0x0B,
            vk::ESCAPE => 0x01,
            vk::BACK => 0x0E,
            vk::TAB => 0x0F,
            vk::RETURN => 0x1C,
            vk::SPACE => 0x39,
            _ => OEM_KEYS
                .iter()
                .find(|(key, ..)| *key == virtual_key)
                .map_or(0, |&(.., scan)| scan),
        }
    }
}
