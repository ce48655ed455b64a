//! Serializable snapshots
//!
//! A snapshot captures what a renderer would show: the rows of the visible
//! viewport, the cursor and the viewport bookkeeping. Snapshots are plain
//! data so tests and the headless runner can compare or print them.

use serde::{Deserialize, Serialize};

use super::buffer::TextBuffer;
use super::cursor::{Cursor, CursorType};
use super::geometry::Viewport;

/// The visible state of a terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Viewport dimensions
    pub cols: usize,
    pub rows: usize,
    /// Buffer row shown at the top of the visible viewport
    pub visible_top: usize,
    /// Rows the view is scrolled back from the mutable viewport
    pub scroll_offset: usize,
    /// Total rows in the logical buffer
    pub buffer_height: usize,
    /// Visible rows, top to bottom
    pub lines: Vec<LineSnapshot>,
    pub cursor: CursorSnapshot,
    pub title: String,
}

/// One visible row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub text: String,
    /// The row continues on the next one
    #[serde(default, skip_serializing_if = "is_false")]
    pub wrapped: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Cursor state, in buffer coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub col: usize,
    pub row: usize,
    pub visible: bool,
    pub blinking: bool,
    pub shape: String,
}

impl From<&Cursor> for CursorSnapshot {
    fn from(cursor: &Cursor) -> Self {
        let position = cursor.position();
        CursorSnapshot {
            col: position.col,
            row: position.row,
            visible: cursor.is_visible(),
            blinking: cursor.is_blinking_allowed(),
            shape: match cursor.cursor_type() {
                CursorType::VerticalBar => "bar".to_string(),
                CursorType::Underscore => "underscore".to_string(),
                CursorType::FullBox => "full_box".to_string(),
                CursorType::EmptyBox => "empty_box".to_string(),
                CursorType::Legacy => "legacy".to_string(),
            },
        }
    }
}

impl Snapshot {
    /// Capture the rows of `visible` from `buffer`
    pub fn capture(buffer: &TextBuffer, visible: Viewport, scroll_offset: usize, title: &str) -> Self {
        let lines = (visible.top()..visible.bottom_exclusive())
            .filter_map(|row| buffer.row(row))
            .map(|row| LineSnapshot {
                text: row.text(),
                wrapped: row.wrap_forced(),
            })
            .collect();

        Snapshot {
            cols: visible.width(),
            rows: visible.height(),
            visible_top: visible.top(),
            scroll_offset,
            buffer_height: buffer.height(),
            lines,
            cursor: CursorSnapshot::from(buffer.cursor()),
            title: title.to_string(),
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Plain text of the visible rows, trailing empty rows dropped
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(&line.text);
            result.push('\n');
        }
        while result.ends_with("\n\n") {
            result.pop();
        }
        result
    }

    /// Compare visible content only
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.lines == other.lines
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::cell::TextAttribute;
    use crate::core::geometry::{Point, Size};
    use crate::render::NullRenderTarget;

    fn buffer() -> TextBuffer {
        let mut buf = TextBuffer::new(
            Size::new(6, 5),
            TextAttribute::default(),
            25,
            Arc::new(NullRenderTarget),
        )
        .unwrap();
        for (row, text) in ["old", "AB", "C"].iter().enumerate() {
            let mut at = Point::new(0, row);
            for unit in text.encode_utf16() {
                at.col += buf.write(&[unit], at).cell_distance;
            }
        }
        buf.cursor_mut().set_position(Point::new(1, 2));
        buf
    }

    #[test]
    fn test_capture_visible_rows() {
        let buf = buffer();
        let visible = Viewport::from_dimensions(Point::new(0, 1), Size::new(6, 3));
        let snapshot = Snapshot::capture(&buf, visible, 0, "title");

        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.visible_top, 1);
        assert_eq!(snapshot.buffer_height, 5);
        assert_eq!(snapshot.lines[0].text, "AB");
        assert_eq!(snapshot.lines[1].text, "C");
        assert_eq!(snapshot.cursor.col, 1);
        assert_eq!(snapshot.cursor.row, 2);
        assert_eq!(snapshot.cursor.shape, "bar");
        assert_eq!(snapshot.to_text(), "AB\nC\n");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let buf = buffer();
        let snapshot = Snapshot::capture(&buf, buf.bounds(), 0, "");
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();

        assert_eq!(snapshot, restored);
        assert!(snapshot.content_equals(&restored));
    }
}
