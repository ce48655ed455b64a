//! Buffer reflow
//!
//! Copies the content of one buffer into a freshly allocated buffer of a
//! different size. Soft-wrapped rows are joined and wrapped again at the new
//! width; rows ended by an explicit line break stay separate lines and lose
//! their trailing blanks. If the content does not fit, the new buffer circles
//! and the oldest rows are dropped.

use tracing::debug;

use super::buffer::TextBuffer;
use super::geometry::{Point, Viewport};

/// What a reflow reports back to the resize coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflowOutcome {
    /// Row in the new buffer holding the end of the old history
    ///
    /// The old history is everything above the old viewport. `None` when
    /// there was no history or all of it was evicted during the copy.
    pub last_scrollback_row: Option<usize>,
}

/// Write head into the new buffer, tracking rows that move when it circles
struct Cursorline {
    at: Point,
    cursor: Option<Point>,
    history: Option<usize>,
    evicted: usize,
}

impl Cursorline {
    fn newline(&mut self, new: &mut TextBuffer) {
        self.at.col = 0;
        if self.at.row + 1 < new.height() {
            self.at.row += 1;
            return;
        }
        new.increment_circular_buffer();
        self.evicted += 1;
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.row = cursor.row.saturating_sub(1);
        }
        self.history = self.history.and_then(|row| row.checked_sub(1));
    }
}

/// Copy `old` into `new`, re-wrapping at `new`'s width
///
/// `old_viewport` is the mutable viewport of `old`. The cursor of `new` is
/// placed on the cell the old cursor was on and takes over the old cursor's
/// visibility and style.
pub fn reflow(old: &TextBuffer, new: &mut TextBuffer, old_viewport: Viewport) -> ReflowOutcome {
    let old_cursor = old.cursor().position();
    let history_row = old_viewport.top().checked_sub(1);
    let last_row = old
        .last_non_blank_row()
        .map_or(old_cursor.row, |row| row.max(old_cursor.row))
        .min(old.height() - 1);
    let new_width = new.width();

    let mut head = Cursorline {
        at: Point::origin(),
        cursor: None,
        history: None,
        evicted: 0,
    };

    for y in 0..=last_row {
        let Some(row) = old.row(y) else {
            break;
        };
        let wrapped = row.wrap_forced();
        let copy_len = if wrapped { row.wrapped_len() } else { row.content_len() };

        for (x, cell) in row.cells().iter().enumerate().take(copy_len) {
            let width = usize::from(cell.width.max(1));
            if !cell.is_continuation() && head.at.col + width > new_width {
                let padded = head.at.col < new_width;
                if let Some(current) = new.row_mut(head.at.row) {
                    current.set_wrap_forced(true);
                    current.set_double_byte_padded(padded);
                }
                head.newline(new);
            }
            if old_cursor == Point::new(x, y) {
                head.cursor = Some(head.at);
            }
            if cell.is_continuation() {
                continue;
            }
            if let Some(current) = new.row_mut(head.at.row) {
                current.put_cell(head.at.col, cell);
            }
            head.at.col += width;
        }

        // A cursor past the end of the content keeps its distance from it
        if old_cursor.row == y && head.cursor.is_none() {
            let beyond = old_cursor.col.saturating_sub(copy_len);
            head.cursor = Some(Point::new((head.at.col + beyond).min(new_width), head.at.row));
        }

        if history_row == Some(y) {
            head.history = Some(head.at.row);
        }

        if y < last_row && !wrapped {
            head.newline(new);
        }
    }

    if head.evicted > 0 {
        debug!(rows = head.evicted, "reflow dropped oldest rows");
    }

    let cursor = head.cursor.unwrap_or(head.at);
    let cursor = Point::new(cursor.col.min(new_width), cursor.row.min(new.height() - 1));
    // The new cursor is not rendered yet, so this never paints
    new.cursor_mut().set_position(cursor);
    new.cursor_mut().copy_properties(old.cursor());

    ReflowOutcome {
        last_scrollback_row: head.history,
    }
}
