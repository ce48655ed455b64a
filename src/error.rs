//! Terminal errors

use std::collections::TryReserveError;

/// Errors that abort a terminal operation
///
/// An operation that fails leaves the terminal exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("failed to allocate a {cols}x{rows} text buffer: {source}")]
    BufferAllocation {
        cols: usize,
        rows: usize,
        #[source]
        source: TryReserveError,
    },
}

pub type Result<T> = std::result::Result<T, TerminalError>;

/// Outcome of a successful resize request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeStatus {
    /// The buffer was rebuilt at the new size
    Resized {
        /// Last row of history above the new mutable viewport, `None` when
        /// the viewport starts at row 0
        last_scrollback_row: Option<usize>,
    },
    /// The requested size matched the current one; nothing changed
    Unchanged,
}
