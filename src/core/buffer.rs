//! Logical text buffer
//!
//! The buffer is a ring of rows: `height` rows of `width` cells, where
//! logical row 0 is the oldest row still held. When output runs past the
//! last row, the oldest row is recycled as the new bottom row instead of
//! moving any cell data ("circling" the buffer).
//!
//! The buffer also owns the cursor and the attributes applied to newly
//! written cells.

use std::collections::TryReserveError;
use std::fmt;
use std::sync::Arc;

use unicode_width::UnicodeWidthChar;

use super::cell::{Cell, TextAttribute};
use super::cursor::Cursor;
use super::geometry::{Point, Size, Viewport};
use super::row::Row;
use crate::error::{Result, TerminalError};
use crate::render::RenderTarget;

/// How far one call to [`TextBuffer::write`] got
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Cells the written glyph occupies
    pub cell_distance: usize,
    /// UTF-16 code units consumed from the input
    pub input_distance: usize,
}

/// Circular logical buffer of rows
pub struct TextBuffer {
    rows: Vec<Row>,
    /// Storage index of logical row 0
    first_row: usize,
    size: Size,
    cursor: Cursor,
    current_attributes: TextAttribute,
    render_target: Arc<dyn RenderTarget>,
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("size", &self.size)
            .field("first_row", &self.first_row)
            .field("cursor", &self.cursor)
            .field("current_attributes", &self.current_attributes)
            .finish_non_exhaustive()
    }
}

fn allocation_error(size: Size, source: TryReserveError) -> TerminalError {
    TerminalError::BufferAllocation {
        cols: size.cols,
        rows: size.rows,
        source,
    }
}

impl TextBuffer {
    /// Allocate a blank buffer
    ///
    /// Dimensions are clamped into `1..=MAX_DIMENSION`. Every allocation is
    /// reserved up front, so running out of memory surfaces as
    /// [`TerminalError::BufferAllocation`] instead of an abort.
    pub fn new(
        size: Size,
        attributes: TextAttribute,
        cursor_size: u32,
        render_target: Arc<dyn RenderTarget>,
    ) -> Result<Self> {
        let size = size.clamped();

        let mut rows = Vec::new();
        rows.try_reserve_exact(size.rows)
            .map_err(|source| allocation_error(size, source))?;
        for _ in 0..size.rows {
            let mut cells = Vec::new();
            cells
                .try_reserve_exact(size.cols)
                .map_err(|source| allocation_error(size, source))?;
            cells.resize(size.cols, Cell::blank(attributes));
            rows.push(Row::from_cells(cells));
        }

        Ok(Self {
            rows,
            first_row: 0,
            size,
            cursor: Cursor::new(cursor_size),
            current_attributes: attributes,
            render_target,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.cols
    }

    pub fn height(&self) -> usize {
        self.size.rows
    }

    /// The whole buffer as a viewport anchored at the origin
    pub fn bounds(&self) -> Viewport {
        Viewport::from_dimensions(Point::origin(), self.size)
    }

    fn storage_index(&self, row: usize) -> usize {
        (self.first_row + row) % self.rows.len()
    }

    /// Get a logical row
    pub fn row(&self, row: usize) -> Option<&Row> {
        if row >= self.size.rows {
            return None;
        }
        self.rows.get(self.storage_index(row))
    }

    /// Get a mutable logical row
    pub fn row_mut(&mut self, row: usize) -> Option<&mut Row> {
        if row >= self.size.rows {
            return None;
        }
        let index = self.storage_index(row);
        self.rows.get_mut(index)
    }

    /// Text of a logical row, trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        self.row(row).map(Row::text).unwrap_or_default()
    }

    /// Last logical row holding any glyph
    pub fn last_non_blank_row(&self) -> Option<usize> {
        (0..self.size.rows)
            .rev()
            .find(|&row| self.row(row).is_some_and(|r| !r.is_blank()))
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Move the cursor, invalidating its cell unless drawing is deferred
    pub fn set_cursor_position(&mut self, position: Point) {
        if self.cursor.set_position(position) {
            self.render_target.trigger_redraw_cursor(position);
        }
    }

    pub fn start_defer_drawing(&mut self) {
        self.cursor.start_defer_drawing();
    }

    /// Resume cursor drawing, issuing the one batched redraw if needed
    pub fn end_defer_drawing(&mut self) {
        if self.cursor.end_defer_drawing() {
            self.render_target
                .trigger_redraw_cursor(self.cursor.position());
        }
    }

    pub fn current_attributes(&self) -> TextAttribute {
        self.current_attributes
    }

    pub fn set_current_attributes(&mut self, attributes: TextAttribute) {
        self.current_attributes = attributes;
    }

    pub fn render_target(&self) -> Arc<dyn RenderTarget> {
        Arc::clone(&self.render_target)
    }

    /// Recycle the oldest row as a blank bottom row
    ///
    /// Every logical row index shifts up by one; the content of row 0 is
    /// gone afterwards.
    pub fn increment_circular_buffer(&mut self) {
        let attrs = self.current_attributes;
        let first = self.first_row;
        self.rows[first].reset(attrs);
        self.first_row = (first + 1) % self.rows.len();
    }

    /// Write the first scalar value of `units` at `at`
    ///
    /// `units` holds one UTF-16 code unit, or a surrogate pair. A lone
    /// surrogate is written as U+FFFD. Zero-width marks attach to the glyph
    /// left of `at` and consume no cells. Nothing is written (and the input
    /// distance is 0) when the glyph does not fit between `at` and the right
    /// edge.
    pub fn write(&mut self, units: &[u16], at: Point) -> WriteResult {
        let Some(decoded) = char::decode_utf16(units.iter().copied()).next() else {
            return WriteResult::default();
        };
        let (c, consumed) = match decoded {
            Ok(c) => (c, c.len_utf16()),
            Err(_) => (char::REPLACEMENT_CHARACTER, 1),
        };
        let attrs = self.current_attributes;
        let width = self.size.cols;

        match c.width() {
            // Control characters take no cells
            None => WriteResult {
                cell_distance: 0,
                input_distance: consumed,
            },
            Some(0) => {
                if let Some(row) = self.row_mut(at.row) {
                    row.append_combining(at.col.min(width), c);
                }
                WriteResult {
                    cell_distance: 0,
                    input_distance: consumed,
                }
            }
            Some(cells) => {
                if at.col + cells > width {
                    return WriteResult::default();
                }
                let Some(row) = self.row_mut(at.row) else {
                    return WriteResult::default();
                };
                row.write_glyph(at.col, c, cells, attrs);
                WriteResult {
                    cell_distance: cells,
                    input_distance: consumed,
                }
            }
        }
    }
}
