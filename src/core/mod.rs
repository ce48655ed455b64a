//! Terminal Core Module
//!
//! Platform-independent buffer state. This module contains:
//! - Viewport geometry
//! - Cell and row representation with attributes
//! - Cursor state with deferred drawing
//! - The circular logical buffer and its reflow
//! - The 256-entry color table
//! - Serializable snapshots
//!
//! Nothing in here locks or notifies; the [`crate::terminal`] module owns
//! the buffer and sequences those concerns around it.

mod buffer;
mod cell;
mod color_table;
mod cursor;
mod geometry;
mod reflow;
mod row;
mod snapshot;

pub use buffer::{TextBuffer, WriteResult};
pub use cell::{Cell, Color, Style, TextAttribute};
pub use color_table::{ColorTable, Rgba, ANSI_COLORS, CAMPBELL, COLOR_TABLE_SIZE};
pub use cursor::{Cursor, CursorType, DEFAULT_CURSOR_SIZE};
pub use geometry::{Point, Size, Viewport, MAX_DIMENSION};
pub use reflow::{reflow, ReflowOutcome};
pub use row::Row;
pub use snapshot::{CursorSnapshot, LineSnapshot, Snapshot};
