//! Viewport geometry
//!
//! Points, sizes and viewports expressed in logical-buffer coordinates.
//! Row 0 is the oldest row of the buffer. All arithmetic saturates, so a
//! viewport can never report a negative top or height.

use serde::{Deserialize, Serialize};

/// Largest row or column count the buffer accepts.
pub const MAX_DIMENSION: usize = i16::MAX as usize;

/// A cell position (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Column (0-indexed)
    pub col: usize,
    /// Row (0-indexed, logical buffer row)
    pub row: usize,
}

impl Point {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    pub const fn origin() -> Self {
        Self { col: 0, row: 0 }
    }
}

/// A size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub cols: usize,
    pub rows: usize,
}

impl Size {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Clamp both dimensions into `1..=MAX_DIMENSION`
    pub fn clamped(self) -> Self {
        Self {
            cols: self.cols.clamp(1, MAX_DIMENSION),
            rows: self.rows.clamp(1, MAX_DIMENSION),
        }
    }

    pub fn area(&self) -> usize {
        self.cols.saturating_mul(self.rows)
    }
}

/// A rectangular window onto the logical buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    origin: Point,
    size: Size,
}

impl Viewport {
    /// A zero-sized viewport at the origin
    pub const fn empty() -> Self {
        Self {
            origin: Point::origin(),
            size: Size::new(0, 0),
        }
    }

    pub const fn from_dimensions(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn dimensions(&self) -> Size {
        self.size
    }

    pub fn left(&self) -> usize {
        self.origin.col
    }

    pub fn top(&self) -> usize {
        self.origin.row
    }

    pub fn width(&self) -> usize {
        self.size.cols
    }

    pub fn height(&self) -> usize {
        self.size.rows
    }

    /// Last row inside the viewport
    ///
    /// For an empty viewport this is the top row itself.
    pub fn bottom_inclusive(&self) -> usize {
        (self.origin.row + self.size.rows).saturating_sub(1).max(self.origin.row)
    }

    /// First row below the viewport
    pub fn bottom_exclusive(&self) -> usize {
        self.origin.row + self.size.rows
    }

    pub fn right_exclusive(&self) -> usize {
        self.origin.col + self.size.cols
    }

    pub fn is_empty(&self) -> bool {
        self.size.cols == 0 || self.size.rows == 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.col >= self.left()
            && point.col < self.right_exclusive()
            && point.row >= self.top()
            && point.row < self.bottom_exclusive()
    }

    /// Same dimensions, top moved to `top`
    pub fn with_top(&self, top: usize) -> Self {
        Self {
            origin: Point::new(self.origin.col, top),
            size: self.size,
        }
    }

    /// Same dimensions, shifted up by `rows`, stopping at row 0
    pub fn scrolled_up(&self, rows: usize) -> Self {
        self.with_top(self.top().saturating_sub(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_bounds() {
        let view = Viewport::from_dimensions(Point::new(0, 10), Size::new(80, 24));
        assert_eq!(view.top(), 10);
        assert_eq!(view.height(), 24);
        assert_eq!(view.bottom_inclusive(), 33);
        assert_eq!(view.bottom_exclusive(), 34);
        assert_eq!(view.dimensions(), Size::new(80, 24));
    }

    #[test]
    fn test_viewport_contains() {
        let view = Viewport::from_dimensions(Point::new(0, 5), Size::new(10, 3));
        assert!(view.contains(Point::new(0, 5)));
        assert!(view.contains(Point::new(9, 7)));
        assert!(!view.contains(Point::new(10, 5)));
        assert!(!view.contains(Point::new(0, 8)));
        assert!(!view.contains(Point::new(0, 4)));
    }

    #[test]
    fn test_viewport_scrolled_up_saturates() {
        let view = Viewport::from_dimensions(Point::new(0, 3), Size::new(10, 5));
        assert_eq!(view.scrolled_up(2).top(), 1);
        assert_eq!(view.scrolled_up(100).top(), 0);
        assert_eq!(view.scrolled_up(100).height(), 5);
    }

    #[test]
    fn test_empty_viewport() {
        let view = Viewport::empty();
        assert!(view.is_empty());
        assert_eq!(view.bottom_inclusive(), 0);
        assert_eq!(view.bottom_exclusive(), 0);
    }

    #[test]
    fn test_size_clamped() {
        assert_eq!(Size::new(0, 0).clamped(), Size::new(1, 1));
        assert_eq!(
            Size::new(usize::MAX, 40).clamped(),
            Size::new(MAX_DIMENSION, 40)
        );
    }
}
