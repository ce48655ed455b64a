//! Terminal
//!
//! [`Terminal`] is the lock owner. One reader/writer lock guards every piece
//! of terminal state, so a writer thread feeding output and any number of
//! render threads reading the buffer never see a half-applied change. Every
//! mutating method holds the write lock for its whole body; queries take the
//! read lock. Callers that need several queries to agree take a guard with
//! [`Terminal::lock_for_reading`] and query [`TerminalState`] directly.

mod callbacks;
mod state;

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use callbacks::{
    BackgroundColorChangedCallback, ScrollPositionChangedCallback, TitleChangedCallback, WriteInputCallback,
};
pub use state::{TerminalState, WriteReport};

use crate::core::{Point, Rgba, Size, Snapshot, Viewport};
use crate::error::{ResizeStatus, Result};
use crate::input::{ControlKeyStates, KeyboardEncoder, KeyboardLayout};
use crate::render::RenderTarget;
use crate::settings::CoreSettings;

/// A terminal core shared between an output thread and render threads
#[derive(Debug)]
pub struct Terminal {
    state: RwLock<TerminalState>,
}

impl Terminal {
    /// Create a terminal with a `viewport_size` viewport and
    /// `scrollback_lines` rows of history
    ///
    /// Dimensions are clamped into `1..=MAX_DIMENSION`.
    pub fn new(
        viewport_size: Size,
        scrollback_lines: usize,
        render_target: Arc<dyn RenderTarget>,
    ) -> Result<Self> {
        Ok(Self {
            state: RwLock::new(TerminalState::create(viewport_size, scrollback_lines, render_target)?),
        })
    }

    /// Create a terminal sized and configured from `settings`
    pub fn from_settings(settings: &CoreSettings, render_target: Arc<dyn RenderTarget>) -> Result<Self> {
        Ok(Self {
            state: RwLock::new(TerminalState::from_settings(settings, render_target)?),
        })
    }

    /// Shared access for rendering
    pub fn lock_for_reading(&self) -> RwLockReadGuard<'_, TerminalState> {
        self.state.read()
    }

    /// Exclusive access for mutation
    pub fn lock_for_writing(&self) -> RwLockWriteGuard<'_, TerminalState> {
        self.state.write()
    }

    pub fn update_settings(&self, settings: &CoreSettings) {
        self.lock_for_writing().update_settings(settings);
    }

    /// Write decoded text at the cursor
    pub fn write(&self, text: &str) -> WriteReport {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.write_utf16(&units)
    }

    /// Write UTF-16 text at the cursor; lone surrogates become U+FFFD
    pub fn write_utf16(&self, units: &[u16]) -> WriteReport {
        self.lock_for_writing().write_buffer(units)
    }

    /// Write a plain output stream with C0 controls
    pub fn process_output(&self, text: &str) -> WriteReport {
        self.lock_for_writing().process_output(text)
    }

    pub fn user_resize(&self, viewport_size: Size) -> Result<ResizeStatus> {
        self.lock_for_writing().user_resize(viewport_size)
    }

    pub fn user_scroll_viewport(&self, view_top: isize) {
        self.lock_for_writing().user_scroll_viewport(view_top);
    }

    pub fn try_snap_on_input(&self) {
        self.lock_for_writing().try_snap_on_input();
    }

    /// Encode a key press; true means the caller must not also send it as a
    /// character event
    pub fn send_key_event(&self, virtual_key: u16, scan_code: u16, states: ControlKeyStates) -> bool {
        self.lock_for_writing()
            .send_key_event(virtual_key, scan_code, states)
    }

    pub fn send_char_event(&self, ch: char) -> bool {
        self.lock_for_writing().send_char_event(ch)
    }

    pub fn set_keyboard_encoder(&self, encoder: Box<dyn KeyboardEncoder>) {
        self.lock_for_writing().set_keyboard_encoder(encoder);
    }

    pub fn set_keyboard_layout(&self, layout: Box<dyn KeyboardLayout>) {
        self.lock_for_writing().set_keyboard_layout(layout);
    }

    pub fn set_cursor_keys_mode(&self, application: bool) {
        self.lock_for_writing().set_cursor_keys_mode(application);
    }

    pub fn set_keypad_mode(&self, application: bool) {
        self.lock_for_writing().set_keypad_mode(application);
    }

    pub fn set_title(&self, title: &str) {
        self.lock_for_writing().set_title(title);
    }

    pub fn set_default_background(&self, color: Rgba) {
        self.lock_for_writing().set_default_background(color);
    }

    pub fn set_color_table_entry(&self, index: usize, color: Rgba) -> bool {
        self.lock_for_writing().set_color_table_entry(index, color)
    }

    pub fn set_cursor_visible(&self, visible: bool) {
        self.lock_for_writing().set_cursor_visible(visible);
    }

    pub fn is_cursor_blinking_allowed(&self) -> bool {
        self.lock_for_reading().is_cursor_blinking_allowed()
    }

    /// Replace the write-input handler
    ///
    /// Handlers run with the write lock held and must not call back into the
    /// terminal. The same holds for every callback setter below.
    pub fn set_write_input_callback(&self, callback: Option<WriteInputCallback>) {
        self.lock_for_writing().set_write_input_callback(callback);
    }

    pub fn set_title_changed_callback(&self, callback: Option<TitleChangedCallback>) {
        self.lock_for_writing().set_title_changed_callback(callback);
    }

    /// Replace the scroll handler, called with (visible top, visible height,
    /// buffer height)
    pub fn set_scroll_position_changed_callback(&self, callback: Option<ScrollPositionChangedCallback>) {
        self.lock_for_writing()
            .set_scroll_position_changed_callback(callback);
    }

    /// Replace the background handler, called with a `0x00BBGGRR` color
    pub fn set_background_callback(&self, callback: Option<BackgroundColorChangedCallback>) {
        self.lock_for_writing().set_background_callback(callback);
    }

    pub fn mutable_viewport(&self) -> Viewport {
        self.lock_for_reading().mutable_viewport()
    }

    pub fn visible_viewport(&self) -> Viewport {
        self.lock_for_reading().visible_viewport()
    }

    pub fn buffer_height(&self) -> usize {
        self.lock_for_reading().buffer_height()
    }

    pub fn view_start_index(&self) -> usize {
        self.lock_for_reading().view_start_index()
    }

    pub fn view_end_index(&self) -> usize {
        self.lock_for_reading().view_end_index()
    }

    /// First row of the visible viewport
    pub fn visible_start_index(&self) -> usize {
        self.lock_for_reading().visible_start_index()
    }

    /// How many rows the view is scrolled back from the live output
    pub fn rows_scrolled_back(&self) -> usize {
        self.lock_for_reading().rows_scrolled_back()
    }

    pub fn cursor_position(&self) -> Point {
        self.lock_for_reading().cursor_position()
    }

    pub fn title(&self) -> String {
        self.lock_for_reading().title().to_string()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock_for_reading().snapshot()
    }
}
