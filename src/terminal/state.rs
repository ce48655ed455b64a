//! Terminal state
//!
//! All mutable terminal state lives in [`TerminalState`]: the logical buffer
//! and its cursor, the mutable viewport, the scroll offset, the color table,
//! settings-derived flags, the keyboard collaborators and the host callbacks.
//! [`super::Terminal`] owns one behind a reader/writer lock; everything here
//! assumes the caller already holds the right side of that lock.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::callbacks::{
    BackgroundColorChangedCallback, Callbacks, ScrollPositionChangedCallback, TitleChangedCallback,
    WriteInputCallback,
};
use crate::core::{
    reflow, ColorTable, Point, Rgba, Size, Snapshot, TextAttribute, TextBuffer, Viewport,
    COLOR_TABLE_SIZE, MAX_DIMENSION,
};
use crate::error::{ResizeStatus, Result};
use crate::input::{vk, ControlKeyStates, KeyEvent, KeyboardEncoder, KeyboardLayout, TerminalInput, UsLayout};
use crate::render::RenderTarget;
use crate::settings::CoreSettings;

/// Cursor height of a freshly created terminal, before settings apply
const INITIAL_CURSOR_SIZE: u32 = 12;

/// Tab stops are every eight columns
const TAB_WIDTH: usize = 8;

/// Counters from one pass of the writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Calls into the buffer's write primitive
    pub attempts: usize,
    /// Units placed in the buffer
    pub units_written: usize,
    /// Rows ended by a soft wrap
    pub soft_wraps: usize,
    /// Units wider than the whole buffer, skipped
    pub units_dropped: usize,
}

/// Keeps cursor drawing deferred for as long as it lives
struct DeferredDraw<'a> {
    state: &'a mut TerminalState,
}

impl<'a> DeferredDraw<'a> {
    fn new(state: &'a mut TerminalState) -> Self {
        state.buffer.start_defer_drawing();
        Self { state }
    }
}

impl Deref for DeferredDraw<'_> {
    type Target = TerminalState;

    fn deref(&self) -> &TerminalState {
        self.state
    }
}

impl DerefMut for DeferredDraw<'_> {
    fn deref_mut(&mut self) -> &mut TerminalState {
        self.state
    }
}

impl Drop for DeferredDraw<'_> {
    fn drop(&mut self) {
        self.state.buffer.end_defer_drawing();
    }
}

/// All state guarded by the terminal lock
pub struct TerminalState {
    buffer: TextBuffer,
    mutable_viewport: Viewport,
    scrollback_lines: usize,
    /// Rows the visible viewport sits above the mutable viewport
    scroll_offset: usize,

    snap_on_input: bool,
    copy_on_select: bool,
    suppress_application_title: bool,
    starting_title: String,
    title: String,
    word_delimiters: String,

    default_fg: Rgba,
    default_bg: Rgba,
    color_table: ColorTable,

    callbacks: Callbacks,
    encoder: Box<dyn KeyboardEncoder>,
    layout: Box<dyn KeyboardLayout>,
}

impl std::fmt::Debug for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalState")
            .field("buffer", &self.buffer)
            .field("mutable_viewport", &self.mutable_viewport)
            .field("scrollback_lines", &self.scrollback_lines)
            .field("scroll_offset", &self.scroll_offset)
            .field("title", &self.title)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

fn is_surrogate(unit: u16) -> bool {
    (0xD800..=0xDFFF).contains(&unit)
}

/// Clamp an integer setting into `min..=MAX_DIMENSION`
fn clamp_setting(name: &'static str, value: i32, min: usize) -> usize {
    let clamped = usize::try_from(value).unwrap_or(0).clamp(min, MAX_DIMENSION);
    if i64::from(value) != clamped as i64 {
        warn!(setting = name, value, clamped, "setting out of range");
    }
    clamped
}

/// Top row for a viewport of `rows` rows that fits the buffer and shows the cursor
fn fit_viewport_top(proposed: usize, rows: usize, buffer_height: usize, cursor_row: usize) -> usize {
    let top = proposed.min(buffer_height.saturating_sub(rows));
    if cursor_row < top {
        cursor_row
    } else if cursor_row >= top + rows {
        cursor_row + 1 - rows
    } else {
        top
    }
}

impl TerminalState {
    /// Allocate a blank terminal with `scrollback_lines` rows of history
    pub(crate) fn create(
        viewport_size: Size,
        scrollback_lines: usize,
        render_target: Arc<dyn RenderTarget>,
    ) -> Result<Self> {
        let viewport_size = viewport_size.clamped();
        let scrollback_lines = scrollback_lines.min(MAX_DIMENSION);
        let buffer_size = Size::new(
            viewport_size.cols,
            (viewport_size.rows + scrollback_lines).min(MAX_DIMENSION),
        );
        let buffer = TextBuffer::new(
            buffer_size,
            TextAttribute::default(),
            INITIAL_CURSOR_SIZE,
            render_target,
        )?;

        Ok(Self {
            buffer,
            mutable_viewport: Viewport::from_dimensions(Point::origin(), viewport_size),
            scrollback_lines,
            scroll_offset: 0,
            snap_on_input: true,
            copy_on_select: false,
            suppress_application_title: false,
            starting_title: String::new(),
            title: String::new(),
            word_delimiters: String::new(),
            default_fg: Rgba::rgb(255, 255, 255),
            default_bg: Rgba::new(0, 0, 0, 0),
            color_table: ColorTable::default(),
            callbacks: Callbacks::default(),
            encoder: Box::new(TerminalInput::new()),
            layout: Box::new(UsLayout::new()),
        })
    }

    /// Allocate a terminal sized and configured from `settings`
    pub(crate) fn from_settings(settings: &CoreSettings, render_target: Arc<dyn RenderTarget>) -> Result<Self> {
        let size = Size::new(
            clamp_setting("initial_cols", settings.initial_cols, 1),
            clamp_setting("initial_rows", settings.initial_rows, 1),
        );
        let history = clamp_setting("history_size", settings.history_size, 0);

        let mut state = Self::create(size, history, render_target)?;
        state.update_settings(settings);
        if state.suppress_application_title {
            state.title = state.starting_title.clone();
        }
        Ok(state)
    }

    /// Copy in everything the settings control
    ///
    /// The buffer is not resized when `history_size` changes.
    pub fn update_settings(&mut self, settings: &CoreSettings) {
        self.default_fg = settings.default_foreground;
        self.default_bg = settings.default_background;

        self.buffer.cursor_mut().set_style(
            settings.cursor_height,
            settings.cursor_color,
            settings.cursor_shape.into(),
        );

        for (index, color) in (0u8..).zip(settings.color_table.iter()) {
            self.color_table.set(index, *color);
        }

        self.snap_on_input = settings.snap_on_input;
        self.word_delimiters = settings.word_delimiters.clone();
        self.copy_on_select = settings.copy_on_select;
        self.suppress_application_title = settings.suppress_application_title;
        self.starting_title = settings.starting_title.clone();
    }

    // ---- Writer ----

    /// Write decoded text at the cursor
    ///
    /// Text that runs past the right edge soft-wraps onto the next row.
    /// Control characters take no cells; see [`Self::process_output`] for a
    /// stream that contains them.
    pub fn write_buffer(&mut self, units: &[u16]) -> WriteReport {
        let mut report = WriteReport::default();
        DeferredDraw::new(self).write_units(units, &mut report);
        report
    }

    fn write_units(&mut self, units: &[u16], report: &mut WriteReport) {
        trace!(units = units.len(), "write");
        let mut index = 0;
        while index < units.len() {
            let len = if is_surrogate(units[index]) && index + 1 < units.len() {
                2
            } else {
                1
            };
            let unit = &units[index..index + len];
            let before = self.buffer.cursor().position();

            report.attempts += 1;
            let result = self.buffer.write(unit, before);

            let proposed = if result.input_distance > 0 {
                index += result.input_distance;
                report.units_written += 1;
                Point::new(before.col + result.cell_distance, before.row)
            } else if before.col == 0 {
                // Wider than the buffer; wrapping again cannot help
                debug!(unit = ?unit, width = self.buffer.width(), "dropping unit wider than buffer");
                index += len;
                report.units_dropped += 1;
                continue;
            } else {
                // Any narrow glyph fits in the last column, so a refusal there is a wide one
                let padded = before.col + 1 == self.buffer.width();
                if let Some(row) = self.buffer.row_mut(before.row) {
                    row.set_wrap_forced(true);
                    row.set_double_byte_padded(padded);
                }
                report.soft_wraps += 1;
                Point::new(0, before.row + 1)
            };

            self.commit_cursor(proposed);
        }
    }

    /// Move the cursor to `proposed`, circling the buffer and sliding the
    /// mutable viewport as needed
    pub fn commit_cursor(&mut self, proposed: Point) {
        let mut proposed = proposed;
        let mut notify_scroll = false;

        let new_rows = (proposed.row + 1).saturating_sub(self.buffer.height());
        if new_rows > 0 {
            for _ in 0..new_rows {
                self.buffer.increment_circular_buffer();
            }
            proposed.row -= new_rows;
            debug!(rows = new_rows, "circled buffer");
            notify_scroll = true;
        }

        self.buffer.set_cursor_position(proposed);

        if proposed.row > self.mutable_viewport.bottom_inclusive() {
            let new_top = proposed.row.saturating_sub(self.mutable_viewport.height().saturating_sub(1));
            if new_top != self.mutable_viewport.top() {
                self.mutable_viewport = self.mutable_viewport.with_top(new_top);
                notify_scroll = true;
            }
        }

        if notify_scroll {
            self.buffer.render_target().trigger_redraw_all();
            self.notify_scroll_event();
        }
    }

    /// Write a plain output stream
    ///
    /// Printable runs go through [`Self::write_buffer`]'s path. CR, LF (and
    /// VT, FF), BS, HT and BEL are executed; every other C0 control, DEL and
    /// ESC are dropped.
    pub fn process_output(&mut self, text: &str) -> WriteReport {
        let units: Vec<u16> = text.encode_utf16().collect();
        let mut report = WriteReport::default();
        let mut state = DeferredDraw::new(self);

        let mut start = 0;
        for (index, &unit) in units.iter().enumerate() {
            if unit < 0x20 || unit == 0x7f {
                if start < index {
                    state.write_units(&units[start..index], &mut report);
                }
                state.execute_c0(unit);
                start = index + 1;
            }
        }
        if start < units.len() {
            state.write_units(&units[start..], &mut report);
        }
        report
    }

    fn execute_c0(&mut self, unit: u16) {
        let cursor = self.buffer.cursor().position();
        let last_col = self.buffer.width() - 1;
        match unit {
            0x07 => trace!("bell"),
            0x08 => {
                let col = cursor.col.min(last_col).saturating_sub(1);
                self.commit_cursor(Point::new(col, cursor.row));
            }
            0x09 => {
                let col = ((cursor.col / TAB_WIDTH + 1) * TAB_WIDTH).min(last_col);
                self.commit_cursor(Point::new(col, cursor.row));
            }
            // VT and FF are treated as LF
            0x0A | 0x0B | 0x0C => self.commit_cursor(Point::new(cursor.col, cursor.row + 1)),
            0x0D => self.commit_cursor(Point::new(0, cursor.row)),
            _ => trace!(control = unit, "ignored control"),
        }
    }

    // ---- Scrolling ----

    /// Scroll the visible viewport so its top is `view_top`
    ///
    /// Anything at or below the mutable viewport's top pins the view to the
    /// live output.
    pub fn user_scroll_viewport(&mut self, view_top: isize) {
        let clamped_top = usize::try_from(view_top).unwrap_or(0);
        self.scroll_offset = self.mutable_viewport.top().saturating_sub(clamped_top);
        self.buffer.render_target().trigger_redraw_all();
    }

    /// Jump back to the live output if snap-on-input is enabled
    pub fn try_snap_on_input(&mut self) {
        if self.snap_on_input && self.scroll_offset != 0 {
            self.scroll_offset = 0;
            self.notify_scroll_event();
        }
    }

    fn notify_scroll_event(&self) {
        let visible = self.visible_viewport();
        self.callbacks
            .scroll_position_changed(visible.top(), visible.height(), self.buffer_height());
    }

    // ---- Resize ----

    /// Resize the viewport, reflowing the buffer into the new width
    ///
    /// Returns [`ResizeStatus::Unchanged`] when `viewport_size` is the current
    /// size. Otherwise the reported scrollback row is always one above the
    /// new mutable viewport. On error nothing changed.
    pub fn user_resize(&mut self, viewport_size: Size) -> Result<ResizeStatus> {
        self.resize_with(viewport_size, |size, attributes, render_target| {
            // Size-0 cursor: nothing paints until reflow copies the style over
            TextBuffer::new(size, attributes, 0, render_target)
        })
    }

    fn resize_with<F>(&mut self, viewport_size: Size, allocate: F) -> Result<ResizeStatus>
    where
        F: FnOnce(Size, TextAttribute, Arc<dyn RenderTarget>) -> Result<TextBuffer>,
    {
        let viewport_size = viewport_size.clamped();
        if viewport_size == self.mutable_viewport.dimensions() {
            return Ok(ResizeStatus::Unchanged);
        }

        let buffer_size = Size::new(
            viewport_size.cols,
            (viewport_size.rows + self.scrollback_lines).min(MAX_DIMENSION),
        );
        let mut new_buffer = allocate(
            buffer_size,
            self.buffer.current_attributes(),
            self.buffer.render_target(),
        )?;

        let outcome = reflow(&self.buffer, &mut new_buffer, self.mutable_viewport);

        let proposed_top = outcome.last_scrollback_row.map_or(0, |row| row + 1);
        let top = fit_viewport_top(
            proposed_top,
            viewport_size.rows,
            new_buffer.height(),
            new_buffer.cursor().position().row,
        );
        if top != proposed_top {
            debug!(proposed_top, top, "fitted viewport after resize");
        }

        self.mutable_viewport = Viewport::from_dimensions(Point::new(0, top), viewport_size);
        self.buffer = new_buffer;
        self.scroll_offset = 0;
        debug!(cols = viewport_size.cols, rows = viewport_size.rows, top, "resized");
        self.notify_scroll_event();

        // Fitting may move the top, so report the history the viewport now sits under
        Ok(ResizeStatus::Resized {
            last_scrollback_row: top.checked_sub(1),
        })
    }

    // ---- Input ----

    /// Encode a key press
    ///
    /// Returns true when the key was fully handled and must not also be
    /// delivered as a character event.
    pub fn send_key_event(&mut self, virtual_key: u16, scan_code: u16, states: ControlKeyStates) -> bool {
        self.try_snap_on_input();

        // Alt+Space belongs to the window system menu
        let mut ch = None;
        if states.is_alt_pressed() && virtual_key != vk::SPACE {
            ch = self.character_from_key_event(virtual_key, scan_code, states);
        }

        if states.is_ctrl_pressed() {
            match virtual_key {
                vk::KEY_H => ch = Some('\x08'),
                vk::SPACE => ch = Some(' '),
                _ => {}
            }
        }

        if virtual_key == vk::ESCAPE {
            ch = Some('\x1b');
        }

        let manually_handled = ch.is_some();
        let event = KeyEvent::key_down(virtual_key, scan_code, ch, states);

        let TerminalState {
            encoder, callbacks, ..
        } = self;
        let translated = encoder.handle_key(&event, &mut |text| callbacks.write_input(text));

        translated && manually_handled
    }

    /// Encode a typed character
    pub fn send_char_event(&mut self, ch: char) -> bool {
        let TerminalState {
            encoder, callbacks, ..
        } = self;
        encoder.handle_char(ch, &mut |text| callbacks.write_input(text))
    }

    fn character_from_key_event(&self, virtual_key: u16, scan_code: u16, states: ControlKeyStates) -> Option<char> {
        let scan_code = if scan_code != 0 {
            scan_code
        } else {
            self.layout.scan_code_from_virtual_key(virtual_key)
        };
        self.layout
            .to_unicode(virtual_key, scan_code, states)
            .filter(|&c| c != '\0')
    }

    pub fn set_keyboard_encoder(&mut self, encoder: Box<dyn KeyboardEncoder>) {
        self.encoder = encoder;
    }

    pub fn set_keyboard_layout(&mut self, layout: Box<dyn KeyboardLayout>) {
        self.layout = layout;
    }

    pub fn set_cursor_keys_mode(&mut self, application: bool) {
        self.encoder.set_cursor_keys_mode(application);
    }

    pub fn set_keypad_mode(&mut self, application: bool) {
        self.encoder.set_keypad_mode(application);
    }

    // ---- Title, colors, cursor ----

    /// Set the window title, unless applications may not change it
    pub fn set_title(&mut self, title: &str) {
        self.title = if self.suppress_application_title {
            self.starting_title.clone()
        } else {
            title.to_string()
        };
        self.callbacks.title_changed(&self.title);
    }

    pub fn set_default_background(&mut self, color: Rgba) {
        self.default_bg = color;
        self.callbacks.background_color_changed(color.to_colorref());
    }

    /// Replace one color table entry
    ///
    /// Returns false (and changes nothing) for an index past the table.
    pub fn set_color_table_entry(&mut self, index: usize, color: Rgba) -> bool {
        let Ok(slot) = u8::try_from(index) else {
            warn!(index, size = COLOR_TABLE_SIZE, "color table index out of range");
            return false;
        };
        self.color_table.set(slot, color);
        self.buffer.render_target().trigger_redraw_all();
        true
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.buffer.cursor_mut().set_visible(visible);
    }

    pub fn is_cursor_blinking_allowed(&self) -> bool {
        self.buffer.cursor().is_blinking_allowed()
    }

    // ---- Callbacks ----

    pub fn set_write_input_callback(&mut self, callback: Option<WriteInputCallback>) {
        self.callbacks.write_input = callback;
    }

    pub fn set_title_changed_callback(&mut self, callback: Option<TitleChangedCallback>) {
        self.callbacks.title_changed = callback;
    }

    pub fn set_scroll_position_changed_callback(&mut self, callback: Option<ScrollPositionChangedCallback>) {
        self.callbacks.scroll_position_changed = callback;
    }

    pub fn set_background_callback(&mut self, callback: Option<BackgroundColorChangedCallback>) {
        self.callbacks.background_color_changed = callback;
    }

    // ---- Queries ----

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The window receiving program output
    pub fn mutable_viewport(&self) -> Viewport {
        self.mutable_viewport
    }

    /// The window shown to the user
    pub fn visible_viewport(&self) -> Viewport {
        self.mutable_viewport
            .with_top(self.mutable_viewport.top().saturating_sub(self.scroll_offset))
    }

    /// Rows in use, up to the bottom of the mutable viewport
    pub fn buffer_height(&self) -> usize {
        self.mutable_viewport.bottom_exclusive()
    }

    /// First row of the mutable viewport; also the amount of history above it
    pub fn view_start_index(&self) -> usize {
        self.mutable_viewport.top()
    }

    pub fn view_end_index(&self) -> usize {
        self.mutable_viewport.bottom_inclusive()
    }

    /// First row of the visible viewport
    pub fn visible_start_index(&self) -> usize {
        self.visible_viewport().top()
    }

    /// How many rows the view is scrolled back from the live output
    pub fn rows_scrolled_back(&self) -> usize {
        self.scroll_offset
    }

    pub fn scrollback_lines(&self) -> usize {
        self.scrollback_lines
    }

    pub fn cursor_position(&self) -> Point {
        self.buffer.cursor().position()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn default_foreground(&self) -> Rgba {
        self.default_fg
    }

    pub fn default_background(&self) -> Rgba {
        self.default_bg
    }

    pub fn color_table(&self) -> &ColorTable {
        &self.color_table
    }

    pub fn word_delimiters(&self) -> &str {
        &self.word_delimiters
    }

    pub fn is_snap_on_input_enabled(&self) -> bool {
        self.snap_on_input
    }

    pub fn is_copy_on_select_enabled(&self) -> bool {
        self.copy_on_select
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.buffer,
            self.visible_viewport(),
            self.scroll_offset,
            &self.title,
        )
    }
}
