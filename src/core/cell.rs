//! Buffer Cell
//!
//! A single cell of the logical buffer: one glyph (plus any combining marks)
//! and the attributes it was written with.

use serde::{Deserialize, Serialize};

/// A single cell in the logical buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The glyph in this cell. Empty for blank cells and for the trailing
    /// half of a wide glyph; may hold several codepoints for combining marks.
    pub content: String,
    /// Display width: 1 for narrow cells, 2 for the lead cell of a wide
    /// glyph, 0 for the trailing half of a wide glyph
    pub width: u8,
    /// Attributes the cell was written with
    pub attrs: TextAttribute,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: String::new(),
            width: 1,
            attrs: TextAttribute::default(),
        }
    }
}

impl Cell {
    /// Create a blank cell carrying the given attributes
    pub fn blank(attrs: TextAttribute) -> Self {
        Self {
            attrs,
            ..Default::default()
        }
    }

    /// Create a cell holding a glyph of the given display width
    pub fn glyph(c: char, width: u8, attrs: TextAttribute) -> Self {
        Self {
            content: c.to_string(),
            width,
            attrs,
        }
    }

    /// Create the trailing half of a wide glyph
    pub fn continuation(attrs: TextAttribute) -> Self {
        Self {
            content: String::new(),
            width: 0,
            attrs,
        }
    }

    /// Check if this cell has no glyph
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check if this cell is the trailing half of a wide glyph
    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Check if this cell is the lead half of a wide glyph
    pub fn is_wide(&self) -> bool {
        self.width == 2
    }

    /// Append a combining mark to the glyph
    pub fn append_combining(&mut self, c: char) {
        self.content.push(c);
    }

    /// Reset the cell to a blank carrying `attrs`
    pub fn erase(&mut self, attrs: TextAttribute) {
        self.content.clear();
        self.width = 1;
        self.attrs = attrs;
    }
}

/// Foreground/background color plus style, applied to newly written cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAttribute {
    pub fg: Color,
    pub bg: Color,
    pub style: Style,
}

impl TextAttribute {
    pub fn new(fg: Color, bg: Color, style: Style) -> Self {
        Self { fg, bg, style }
    }

    /// Check if both colors are the terminal defaults
    pub fn is_default_colors(&self) -> bool {
        self.fg == Color::Default && self.bg == Color::Default
    }
}

/// Color reference stored in a cell
///
/// Indexed colors resolve through the terminal's color table; `Default`
/// resolves to the configured default foreground or background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// Color table index (0-255)
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Standard ANSI colors (0-7)
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);
}

/// Text style attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Style {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
