//! Color table
//!
//! 256 RGBA entries: the 16 ANSI slots (Campbell scheme by default), the
//! 6x6x6 xterm color cube and the 24-step grayscale ramp. Every entry in
//! the table is fully opaque.

use serde::{Deserialize, Serialize};

/// An RGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Pack as `0x00BBGGRR`, the channel order handed to the host
    pub const fn to_colorref(self) -> u32 {
        (self.b as u32) << 16 | (self.g as u32) << 8 | self.r as u32
    }
}

/// Number of entries in the color table
pub const COLOR_TABLE_SIZE: usize = 256;

/// Number of indexable ANSI slots at the start of the table
pub const ANSI_COLORS: usize = 16;

/// The Campbell scheme used for the 16 ANSI slots
pub const CAMPBELL: [Rgba; ANSI_COLORS] = [
    Rgba::rgb(12, 12, 12),    // Black
    Rgba::rgb(197, 15, 31),   // Red
    Rgba::rgb(19, 161, 14),   // Green
    Rgba::rgb(193, 156, 0),   // Yellow
    Rgba::rgb(0, 55, 218),    // Blue
    Rgba::rgb(136, 23, 152),  // Magenta
    Rgba::rgb(58, 150, 221),  // Cyan
    Rgba::rgb(204, 204, 204), // White
    Rgba::rgb(118, 118, 118), // Bright Black
    Rgba::rgb(231, 72, 86),   // Bright Red
    Rgba::rgb(22, 198, 12),   // Bright Green
    Rgba::rgb(249, 241, 165), // Bright Yellow
    Rgba::rgb(59, 120, 255),  // Bright Blue
    Rgba::rgb(180, 0, 158),   // Bright Magenta
    Rgba::rgb(97, 214, 214),  // Bright Cyan
    Rgba::rgb(242, 242, 242), // Bright White
];

/// Standard xterm values for the 16 ANSI slots, before a scheme is applied
const XTERM_ANSI: [(u8, u8, u8); ANSI_COLORS] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// 256-entry color lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: [Rgba; COLOR_TABLE_SIZE],
}

impl Default for ColorTable {
    fn default() -> Self {
        let mut table = Self {
            entries: [Rgba::default(); COLOR_TABLE_SIZE],
        };
        table.initialize_256();
        table.apply_scheme(&CAMPBELL);
        table.set_alpha(0xff);
        table
    }
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill all 256 entries with the xterm palette
    fn initialize_256(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let (r, g, b) = xterm_rgb(index as u8);
            *entry = Rgba::new(r, g, b, 0);
        }
    }

    /// Overwrite the 16 ANSI slots
    pub fn apply_scheme(&mut self, scheme: &[Rgba; ANSI_COLORS]) {
        self.entries[..ANSI_COLORS].copy_from_slice(scheme);
    }

    fn set_alpha(&mut self, alpha: u8) {
        for entry in &mut self.entries {
            entry.a = alpha;
        }
    }

    pub fn get(&self, index: u8) -> Rgba {
        self.entries[usize::from(index)]
    }

    /// Replace one entry; the stored value is always opaque
    pub fn set(&mut self, index: u8, color: Rgba) {
        self.entries[usize::from(index)] = color.with_alpha(0xff);
    }

    /// The 16 ANSI slots
    pub fn ansi(&self) -> &[Rgba] {
        &self.entries[..ANSI_COLORS]
    }

    pub fn entries(&self) -> &[Rgba; COLOR_TABLE_SIZE] {
        &self.entries
    }
}

/// xterm 256-color palette value for an index
fn xterm_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => XTERM_ANSI[usize::from(index)],
        // 216 color cube (16-231)
        16..=231 => {
            let n = index - 16;
            let r = n / 36;
            let g = (n % 36) / 6;
            let b = n % 6;
            let to_component = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (to_component(r), to_component(g), to_component(b))
        }
        // Grayscale (232-255)
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_uses_campbell() {
        let table = ColorTable::default();
        assert_eq!(table.get(0), Rgba::rgb(12, 12, 12));
        assert_eq!(table.get(1), Rgba::rgb(197, 15, 31));
        assert_eq!(table.get(15), Rgba::rgb(242, 242, 242));
        assert_eq!(table.ansi(), &CAMPBELL[..]);
    }

    #[test]
    fn test_extended_palette() {
        let table = ColorTable::default();
        assert_eq!(table.get(16), Rgba::rgb(0, 0, 0));
        assert_eq!(table.get(231), Rgba::rgb(255, 255, 255));
        assert_eq!(table.get(196), Rgba::rgb(255, 0, 0));
        assert_eq!(table.get(232), Rgba::rgb(8, 8, 8));
        assert_eq!(table.get(255), Rgba::rgb(238, 238, 238));
    }

    #[test]
    fn test_all_entries_opaque() {
        let table = ColorTable::default();
        assert!(table.entries().iter().all(|c| c.a == 0xff));
    }

    #[test]
    fn test_set_forces_alpha() {
        let mut table = ColorTable::default();
        table.set(3, Rgba::new(1, 2, 3, 0));
        assert_eq!(table.get(3), Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn test_colorref_channel_order() {
        assert_eq!(Rgba::rgb(0x12, 0x34, 0x56).to_colorref(), 0x0056_3412);
    }
}
