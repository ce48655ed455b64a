//! Termcore Terminal Emulation Library
//!
//! The state core of a terminal emulator: it turns decoded output text into
//! buffer mutations, keeps the scrollback and viewports consistent, reflows
//! on resize, and turns key presses into application input. Parsing escape
//! sequences and painting pixels happen elsewhere.
//!
//! - `core`: Viewport geometry, cells, rows, cursor, circular buffer, reflow
//! - `terminal`: The lock-guarded terminal state and its operations
//! - `input`: Key events, the default encoder and keyboard layout
//! - `render`: The paint invalidation seam
//! - `settings`: JSON-backed core settings

pub mod core;
pub mod error;
pub mod input;
pub mod render;
pub mod settings;
pub mod terminal;

pub use crate::core::{Point, Size, Snapshot, Viewport};
pub use error::{ResizeStatus, Result, TerminalError};
pub use render::{NullRenderTarget, RenderTarget};
pub use settings::{CoreSettings, CursorStyle, SettingsError};
pub use terminal::{Terminal, TerminalState, WriteReport};
