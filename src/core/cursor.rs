//! Cursor state management
//!
//! The cursor tracks its position in logical-buffer coordinates, its
//! visibility and rendering style, and a deferred-draw mode. While drawing is
//! deferred, position changes are only recorded; the single redraw happens
//! when the deferral ends.

use serde::{Deserialize, Serialize};

use super::color_table::Rgba;
use super::geometry::Point;

/// Default cursor height, as a percentage of the cell height
pub const DEFAULT_CURSOR_SIZE: u32 = 25;

/// Cursor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorType {
    /// Thin vertical bar
    #[default]
    VerticalBar,
    /// Underline
    Underscore,
    /// Filled rectangle
    FullBox,
    /// Outlined rectangle
    EmptyBox,
    /// Height given by the cursor size percentage
    Legacy,
}

/// Cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    position: Point,
    /// Whether the cursor is visible (DECTCEM)
    visible: bool,
    /// Whether the cursor may blink
    blinking_allowed: bool,
    /// Height as a percentage of the cell; 0 means "do not render"
    size: u32,
    color: Rgba,
    cursor_type: CursorType,
    /// Redraws are batched until drawing is resumed
    deferred: bool,
    /// The position changed while drawing was deferred
    pending_redraw: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR_SIZE)
    }
}

impl Cursor {
    /// Create a cursor at the home position
    pub fn new(size: u32) -> Self {
        Self {
            position: Point::origin(),
            visible: true,
            blinking_allowed: true,
            size,
            color: Rgba::rgb(255, 255, 255),
            cursor_type: CursorType::default(),
            deferred: false,
            pending_redraw: false,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Move the cursor
    ///
    /// Returns true when the move should be drawn right away, false when
    /// drawing is deferred (the redraw is recorded for later).
    pub fn set_position(&mut self, position: Point) -> bool {
        self.position = position;
        if self.deferred {
            self.pending_redraw = true;
            false
        } else {
            self.is_rendered()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_blinking_allowed(&self) -> bool {
        self.blinking_allowed
    }

    pub fn set_blinking_allowed(&mut self, allowed: bool) {
        self.blinking_allowed = allowed;
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn cursor_type(&self) -> CursorType {
        self.cursor_type
    }

    /// Set the cursor height, color and shape
    pub fn set_style(&mut self, size: u32, color: Rgba, cursor_type: CursorType) {
        self.size = size.min(100);
        self.color = color;
        self.cursor_type = cursor_type;
    }

    /// A size-0 cursor is never painted
    pub fn is_rendered(&self) -> bool {
        self.size > 0
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn start_defer_drawing(&mut self) {
        self.deferred = true;
    }

    /// Resume drawing
    ///
    /// Returns true if a redraw was recorded while deferred and should be
    /// issued now.
    pub fn end_defer_drawing(&mut self) -> bool {
        self.deferred = false;
        std::mem::take(&mut self.pending_redraw) && self.is_rendered()
    }

    /// Copy everything except position and deferral state from `other`
    pub fn copy_properties(&mut self, other: &Cursor) {
        self.visible = other.visible;
        self.blinking_allowed = other.blinking_allowed;
        self.size = other.size;
        self.color = other.color;
        self.cursor_type = other.cursor_type;
    }
}
