//! Input Encoding Module
//!
//! Keyboard events arrive from a platform adapter as a virtual key, a scan
//! code and the modifier state. The terminal resolves a character where the
//! encoder needs one, then hands a [`KeyEvent`] to a [`KeyboardEncoder`],
//! which turns it into the text an application expects.
//!
//! # Keyboard Encoding
//!
//! Different keys produce different sequences depending on:
//! - Application cursor mode (DECCKM)
//! - Application keypad mode (DECKPAM/DECKPNM)
//! - Modifier keys (Shift, Ctrl, Alt)
//!
//! The defaults are [`TerminalInput`] for encoding and [`UsLayout`] for
//! resolving characters.

mod encoder;
mod layout;

pub use encoder::TerminalInput;
pub use layout::UsLayout;

use bitflags::bitflags;

bitflags! {
    /// Modifier and toggle key state, with the Windows console bit values
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ControlKeyStates: u32 {
        const RIGHT_ALT = 0x0001;
        const LEFT_ALT = 0x0002;
        const RIGHT_CTRL = 0x0004;
        const LEFT_CTRL = 0x0008;
        const SHIFT = 0x0010;
        const NUMLOCK = 0x0020;
        const SCROLLLOCK = 0x0040;
        const CAPSLOCK = 0x0080;
        const ENHANCED_KEY = 0x0100;
    }
}

impl ControlKeyStates {
    pub fn is_alt_pressed(self) -> bool {
        self.intersects(Self::LEFT_ALT | Self::RIGHT_ALT)
    }

    pub fn is_ctrl_pressed(self) -> bool {
        self.intersects(Self::LEFT_CTRL | Self::RIGHT_CTRL)
    }

    pub fn is_shift_pressed(self) -> bool {
        self.contains(Self::SHIFT)
    }
}

/// Virtual key codes
pub mod vk {
    pub const BACK: u16 = 0x08;
    pub const TAB: u16 = 0x09;
    pub const RETURN: u16 = 0x0D;
    pub const ESCAPE: u16 = 0x1B;
    pub const SPACE: u16 = 0x20;
    pub const PRIOR: u16 = 0x21;
    pub const NEXT: u16 = 0x22;
    pub const END: u16 = 0x23;
    pub const HOME: u16 = 0x24;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;
    pub const INSERT: u16 = 0x2D;
    pub const DELETE: u16 = 0x2E;
    /// The 'H' key
    pub const KEY_H: u16 = 0x48;
    pub const NUMPAD0: u16 = 0x60;
    pub const NUMPAD9: u16 = 0x69;
    pub const MULTIPLY: u16 = 0x6A;
    pub const ADD: u16 = 0x6B;
    pub const SUBTRACT: u16 = 0x6D;
    pub const DECIMAL: u16 = 0x6E;
    pub const DIVIDE: u16 = 0x6F;
    pub const F1: u16 = 0x70;
    pub const F12: u16 = 0x7B;
    /// ";:"
    pub const OEM_1: u16 = 0xBA;
    /// "=+"
    pub const OEM_PLUS: u16 = 0xBB;
    /// ",<"
    pub const OEM_COMMA: u16 = 0xBC;
    /// "-_"
    pub const OEM_MINUS: u16 = 0xBD;
    /// ".>"
    pub const OEM_PERIOD: u16 = 0xBE;
    /// "/?"
    pub const OEM_2: u16 = 0xBF;
    /// "`~"
    pub const OEM_3: u16 = 0xC0;
    /// "[{"
    pub const OEM_4: u16 = 0xDB;
    /// "\|"
    pub const OEM_5: u16 = 0xDC;
    /// "]}"
    pub const OEM_6: u16 = 0xDD;
    /// "'\""
    pub const OEM_7: u16 = 0xDE;
}

/// A keyboard event, with its character already resolved where needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    key_down: bool,
    repeat_count: u16,
    virtual_key: u16,
    scan_code: u16,
    character: Option<char>,
    states: ControlKeyStates,
}

impl KeyEvent {
    pub fn new(
        key_down: bool,
        repeat_count: u16,
        virtual_key: u16,
        scan_code: u16,
        character: Option<char>,
        states: ControlKeyStates,
    ) -> Self {
        Self {
            key_down,
            repeat_count,
            virtual_key,
            scan_code,
            character,
            states,
        }
    }

    /// A single key press
    ///
    /// The repeat count is 0, as for a synthesized press; encoders emit such
    /// an event once.
    pub fn key_down(virtual_key: u16, scan_code: u16, character: Option<char>, states: ControlKeyStates) -> Self {
        Self::new(true, 0, virtual_key, scan_code, character, states)
    }

    pub fn is_key_down(&self) -> bool {
        self.key_down
    }

    pub fn repeat_count(&self) -> u16 {
        self.repeat_count
    }

    pub fn virtual_key(&self) -> u16 {
        self.virtual_key
    }

    pub fn scan_code(&self) -> u16 {
        self.scan_code
    }

    pub fn character(&self) -> Option<char> {
        self.character
    }

    pub fn states(&self) -> ControlKeyStates {
        self.states
    }
}

/// Turns key and character events into application input
///
/// Encoded text goes to `sink`; the return value tells whether the event
/// was translated.
pub trait KeyboardEncoder: Send + Sync {
    fn handle_key(&mut self, event: &KeyEvent, sink: &mut dyn FnMut(&str)) -> bool;

    fn handle_char(&mut self, ch: char, sink: &mut dyn FnMut(&str)) -> bool;

    /// DECCKM
    fn set_cursor_keys_mode(&mut self, _application: bool) {}

    /// DECKPAM / DECKPNM
    fn set_keypad_mode(&mut self, _application: bool) {}
}

/// Resolves the character a key produces
pub trait KeyboardLayout: Send + Sync {
    fn to_unicode(&self, virtual_key: u16, scan_code: u16, states: ControlKeyStates) -> Option<char>;

    fn scan_code_from_virtual_key(&self, virtual_key: u16) -> u16;
}
