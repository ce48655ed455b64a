//! Buffer row representation
//!
//! A row of cells in the logical buffer, with a flag recording whether the
//! row was soft-wrapped (its content continues on the next row because it
//! reached the right edge, as opposed to an explicit line break).

use serde::{Deserialize, Serialize};

use super::cell::{Cell, TextAttribute};

/// A row of cells in the logical buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<Cell>,
    /// Content continues on the next row (soft wrap)
    wrap_forced: bool,
    /// The last cell is padding left by a wide glyph that moved to the next row
    #[serde(default)]
    double_byte_padded: bool,
}

impl Row {
    /// Create a blank row of `cols` cells carrying `attrs`
    pub fn new(cols: usize, attrs: TextAttribute) -> Self {
        Self {
            cells: vec![Cell::blank(attrs); cols],
            wrap_forced: false,
            double_byte_padded: false,
        }
    }

    /// Build a row from an already-reserved cell vector
    pub(crate) fn from_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            wrap_forced: false,
            double_byte_padded: false,
        }
    }

    /// Get the number of columns in this row
    pub fn cols(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn wrap_forced(&self) -> bool {
        self.wrap_forced
    }

    pub fn set_wrap_forced(&mut self, wrapped: bool) {
        self.wrap_forced = wrapped;
    }

    pub fn double_byte_padded(&self) -> bool {
        self.double_byte_padded
    }

    pub fn set_double_byte_padded(&mut self, padded: bool) {
        self.double_byte_padded = padded;
    }

    /// Cells that carry content when the row continues on the next one
    ///
    /// A padded row drops its last cell, which only held the place of a
    /// wide glyph that did not fit.
    pub fn wrapped_len(&self) -> usize {
        if self.double_byte_padded {
            self.cells.len().saturating_sub(1)
        } else {
            self.cells.len()
        }
    }

    /// Blank every cell and clear the wrap flags
    pub fn reset(&mut self, attrs: TextAttribute) {
        for cell in &mut self.cells {
            cell.erase(attrs);
        }
        self.wrap_forced = false;
        self.double_byte_padded = false;
    }

    /// Place a glyph of display width 1 or 2 at `col`
    ///
    /// The caller guarantees `col + width <= cols()`. Any wide glyph that
    /// gets half-overwritten has its other half blanked.
    pub fn write_glyph(&mut self, col: usize, c: char, width: usize, attrs: TextAttribute) {
        self.clear_wide_fragments(col, width);
        self.cells[col] = Cell::glyph(c, width as u8, attrs);
        if width == 2 {
            self.cells[col + 1] = Cell::continuation(attrs);
        }
    }

    /// Place a copy of an existing cell (and its trailing half, if wide)
    pub fn put_cell(&mut self, col: usize, cell: &Cell) {
        let width = usize::from(cell.width.max(1));
        if col + width > self.cells.len() {
            return;
        }
        self.clear_wide_fragments(col, width);
        self.cells[col] = cell.clone();
        if width == 2 {
            self.cells[col + 1] = Cell::continuation(cell.attrs);
        }
    }

    /// Append a combining mark to the glyph ending just before `col`
    pub fn append_combining(&mut self, col: usize, c: char) {
        let Some(mut target) = col.checked_sub(1) else {
            return;
        };
        if self.cells.get(target).is_some_and(Cell::is_continuation) {
            target = target.saturating_sub(1);
        }
        if let Some(cell) = self.cells.get_mut(target) {
            if !cell.is_empty() {
                cell.append_combining(c);
            }
        }
    }

    fn clear_wide_fragments(&mut self, col: usize, width: usize) {
        // Overwriting the trailing half orphans the lead cell to the left
        if self.cells[col].is_continuation() && col > 0 {
            let attrs = self.cells[col - 1].attrs;
            self.cells[col - 1].erase(attrs);
        }
        // Overwriting a lead cell orphans its trailing half to the right
        let last = col + width - 1;
        if self.cells[last].is_wide() && last + 1 < self.cells.len() {
            let attrs = self.cells[last + 1].attrs;
            self.cells[last + 1].erase(attrs);
        }
    }

    /// Length of content, excluding trailing blank cells
    pub fn content_len(&self) -> usize {
        self.cells
            .iter()
            .rposition(|c| !c.is_empty())
            .map(|i| i + 1 + usize::from(self.cells[i].is_wide()))
            .unwrap_or(0)
            .min(self.cells.len())
    }

    /// Check if the row holds no glyphs
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Get the text content of this row, with trailing blanks trimmed
    pub fn text(&self) -> String {
        let mut result = String::new();
        for cell in &self.cells {
            if cell.is_continuation() {
                continue;
            }
            if cell.is_empty() {
                result.push(' ');
            } else {
                result.push_str(&cell.content);
            }
        }
        result.trim_end().to_string()
    }
}
