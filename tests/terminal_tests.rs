//! Integration tests for the terminal core
//!
//! These drive the public `Terminal` API the way a host would: feed output,
//! resize, scroll and send keys, then check the buffer, viewports and the
//! notifications the host received.

use std::sync::{Arc, Mutex};

use termcore::core::{Point, Rgba, Size};
use termcore::input::{vk, ControlKeyStates, KeyEvent, KeyboardEncoder};
use termcore::{CoreSettings, NullRenderTarget, ResizeStatus, Terminal};

fn terminal(cols: usize, rows: usize, scrollback: usize) -> Terminal {
    Terminal::new(Size::new(cols, rows), scrollback, Arc::new(NullRenderTarget)).unwrap()
}

type ScrollLog = Arc<Mutex<Vec<(usize, usize, usize)>>>;

fn record_scrolls(terminal: &Terminal) -> ScrollLog {
    let log: ScrollLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    terminal.set_scroll_position_changed_callback(Some(Box::new(move |top, height, total| {
        sink.lock().unwrap().push((top, height, total));
    })));
    log
}

fn record_input(terminal: &Terminal) -> Arc<Mutex<String>> {
    let out = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&out);
    terminal.set_write_input_callback(Some(Box::new(move |text| {
        sink.lock().unwrap().push_str(text);
    })));
    out
}

fn row_text(terminal: &Terminal, row: usize) -> String {
    terminal.lock_for_reading().buffer().row_text(row)
}

/// Encoder that records every key event and reports a fixed result
struct RecordingEncoder {
    events: Arc<Mutex<Vec<KeyEvent>>>,
    translate: bool,
}

impl KeyboardEncoder for RecordingEncoder {
    fn handle_key(&mut self, event: &KeyEvent, _sink: &mut dyn FnMut(&str)) -> bool {
        self.events.lock().unwrap().push(*event);
        self.translate
    }

    fn handle_char(&mut self, _ch: char, _sink: &mut dyn FnMut(&str)) -> bool {
        self.translate
    }
}

fn recording_encoder(terminal: &Terminal, translate: bool) -> Arc<Mutex<Vec<KeyEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    terminal.set_keyboard_encoder(Box::new(RecordingEncoder {
        events: Arc::clone(&events),
        translate,
    }));
    events
}

// ---- Writer ----

#[test]
fn test_printable_text_advances_column() {
    let term = terminal(20, 5, 0);
    term.write("hello");
    assert_eq!(term.cursor_position(), Point::new(5, 0));

    term.write(" world");
    assert_eq!(term.cursor_position(), Point::new(11, 0));
    assert_eq!(row_text(&term, 0), "hello world");
}

#[test]
fn test_overflowing_row_soft_wraps() {
    let term = terminal(5, 3, 0);
    term.write("abcde");
    assert_eq!(term.cursor_position(), Point::new(5, 0));

    let report = term.write("f");
    assert_eq!(report.soft_wraps, 1);
    assert_eq!(term.cursor_position(), Point::new(1, 1));

    let state = term.lock_for_reading();
    assert!(state.buffer().row(0).unwrap().wrap_forced());
    assert!(!state.buffer().row(1).unwrap().wrap_forced());
    let written: usize = (0..3).map(|row| state.buffer().row_text(row).len()).sum();
    assert_eq!(written, 6);
}

#[test]
fn test_surrogate_pair_is_one_unit() {
    let term = terminal(10, 3, 0);
    let report = term.write_utf16(&[0xD83D, 0xDE00]);

    assert_eq!(report.attempts, 1);
    assert_eq!(report.units_written, 1);
    assert_eq!(term.cursor_position(), Point::new(2, 0));
    assert_eq!(row_text(&term, 0), "\u{1F600}");
}

#[test]
fn test_wide_glyph_wraps_whole() {
    let term = terminal(5, 3, 0);
    term.write("abcd中");

    assert_eq!(row_text(&term, 0), "abcd");
    assert_eq!(row_text(&term, 1), "中");
    assert_eq!(term.cursor_position(), Point::new(2, 1));
}

#[test]
fn test_eviction_drops_oldest_row_and_notifies() {
    let term = terminal(5, 2, 2);
    let scrolls = record_scrolls(&term);

    term.write("aaaaabbbbbcccccdddddeeeee");

    let state = term.lock_for_reading();
    let buffer_height = state.buffer().height();
    assert_eq!(buffer_height, 4);
    assert!((0..buffer_height).all(|row| state.buffer().row_text(row) != "aaaaa"));
    assert_eq!(state.buffer().row_text(0), "bbbbb");
    assert_eq!(state.buffer().row_text(3), "eeeee");

    let last = *scrolls.lock().unwrap().last().unwrap();
    assert_eq!(last, (2, 2, buffer_height));
}

#[test]
fn test_panicking_scroll_handler_does_not_break_output() {
    let term = terminal(5, 2, 0);
    term.set_scroll_position_changed_callback(Some(Box::new(|_, _, _| panic!("host failure"))));

    term.process_output("one\r\ntwo\r\nthree");

    assert_eq!(term.cursor_position(), Point::new(5, 1));
    assert_eq!(row_text(&term, 0), "two");
    assert_eq!(row_text(&term, 1), "three");
}

#[test]
fn test_process_output_line_feeds_scroll() {
    let term = terminal(10, 3, 10);
    let scrolls = record_scrolls(&term);

    term.process_output("l0\r\nl1\r\nl2\r\nl3\r\nl4");

    assert_eq!(term.view_start_index(), 2);
    assert_eq!(term.view_end_index(), 4);
    assert_eq!(term.cursor_position(), Point::new(2, 4));
    assert_eq!(*scrolls.lock().unwrap(), vec![(1, 3, 4), (2, 3, 5)]);
    assert_eq!(term.snapshot().to_text(), "l2\nl3\nl4\n");
}

// ---- Resize ----

#[test]
fn test_resize_to_same_size_is_noop() {
    let term = terminal(10, 4, 5);
    term.process_output("first\r\nsecond line\r\nthird");
    let before = term.snapshot();
    let viewport = term.mutable_viewport();
    let rows: Vec<_> = {
        let state = term.lock_for_reading();
        (0..state.buffer().height())
            .map(|row| state.buffer().row(row).unwrap().clone())
            .collect()
    };

    assert_eq!(term.user_resize(Size::new(10, 4)).unwrap(), ResizeStatus::Unchanged);

    assert_eq!(term.snapshot(), before);
    assert_eq!(term.mutable_viewport(), viewport);
    let state = term.lock_for_reading();
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(state.buffer().row(index).unwrap(), row);
    }
}

#[test]
fn test_resize_smaller_keeps_scrollback_depth() {
    let term = terminal(10, 5, 10);
    let lines: Vec<String> = (0..8).map(|i| format!("line{i}")).collect();
    term.process_output(&lines.join("\r\n"));
    assert_eq!(term.view_start_index(), 3);

    // Cursor up to the second row of the viewport, as a parser would
    term.lock_for_writing().commit_cursor(Point::new(0, 4));

    let status = term.user_resize(Size::new(10, 3)).unwrap();
    let ResizeStatus::Resized { last_scrollback_row } = status else {
        panic!("expected a resize, got {status:?}");
    };

    assert_eq!(last_scrollback_row, Some(2));
    assert_eq!(term.view_start_index(), last_scrollback_row.unwrap() + 1);
    assert_eq!(term.cursor_position(), Point::new(0, 4));
    assert_eq!(row_text(&term, 4), "line4");
    assert_eq!(term.mutable_viewport().dimensions(), Size::new(10, 3));
}

#[test]
fn test_resize_smaller_follows_cursor_at_bottom() {
    let term = terminal(10, 5, 10);
    let lines: Vec<String> = (0..8).map(|i| format!("line{i}")).collect();
    term.process_output(&lines.join("\r\n"));

    let status = term.user_resize(Size::new(10, 3)).unwrap();

    // The viewport is fitted so the cursor stays on screen
    let viewport = term.mutable_viewport();
    assert_eq!(viewport.top(), 5);
    assert!(viewport.contains(term.cursor_position()));
    assert_eq!(term.snapshot().to_text(), "line5\nline6\nline7\n");

    // The reported history ends right above the fitted viewport
    assert_eq!(status, ResizeStatus::Resized { last_scrollback_row: Some(4) });
}

#[test]
fn test_resize_status_matches_viewport_after_long_output() {
    let term = terminal(10, 5, 10);
    for i in 0..20 {
        term.process_output(&format!("L{i}\r\n"));
    }

    let status = term.user_resize(Size::new(10, 3)).unwrap();
    let ResizeStatus::Resized { last_scrollback_row } = status else {
        panic!("expected a resize, got {status:?}");
    };

    assert_eq!(term.view_start_index(), last_scrollback_row.map_or(0, |row| row + 1));
    assert!(term.mutable_viewport().contains(term.cursor_position()));
}

#[test]
fn test_widening_after_wide_glyph_wrap_is_lossless() {
    let term = terminal(4, 4, 0);
    term.write("abc中d");
    assert_eq!(row_text(&term, 0), "abc");
    assert_eq!(row_text(&term, 1), "中d");
    assert!(term.lock_for_reading().buffer().row(0).unwrap().double_byte_padded());

    term.user_resize(Size::new(10, 4)).unwrap();
    assert_eq!(row_text(&term, 0), "abc中d");
    assert_eq!(term.cursor_position(), Point::new(6, 0));

    // Repeated narrow/widen cycles never add padding to the content
    for _ in 0..3 {
        term.user_resize(Size::new(4, 4)).unwrap();
        term.user_resize(Size::new(10, 4)).unwrap();
    }
    assert_eq!(row_text(&term, 0), "abc中d");
    assert_eq!(row_text(&term, 1), "");
}

#[test]
fn test_resize_narrower_rewraps() {
    let term = terminal(10, 3, 5);
    term.write("abcdefghijkl");
    assert_eq!(term.cursor_position(), Point::new(2, 1));

    term.user_resize(Size::new(6, 3)).unwrap();

    assert_eq!(row_text(&term, 0), "abcdef");
    assert_eq!(row_text(&term, 1), "ghijkl");
    assert_eq!(row_text(&term, 2), "");
    assert_eq!(term.cursor_position(), Point::new(6, 1));
    assert_eq!(term.lock_for_reading().buffer().height(), 8);
}

#[test]
fn test_resize_resets_scroll_and_notifies() {
    let term = terminal(10, 3, 10);
    term.process_output("a\r\nb\r\nc\r\nd\r\ne");
    term.user_scroll_viewport(0);
    assert_ne!(term.visible_start_index(), term.view_start_index());

    let scrolls = record_scrolls(&term);
    term.user_resize(Size::new(12, 3)).unwrap();

    assert_eq!(term.visible_start_index(), term.view_start_index());
    assert_eq!(scrolls.lock().unwrap().len(), 1);
}

#[test]
fn test_resize_keeps_cursor_style() {
    let settings = CoreSettings {
        initial_cols: 10,
        initial_rows: 3,
        history_size: 5,
        cursor_height: 50,
        ..Default::default()
    };
    let term = Terminal::from_settings(&settings, Arc::new(NullRenderTarget)).unwrap();
    term.set_cursor_visible(false);

    term.user_resize(Size::new(20, 6)).unwrap();

    let state = term.lock_for_reading();
    assert_eq!(state.buffer().cursor().size(), 50);
    assert!(!state.buffer().cursor().is_visible());
}

// ---- Scrolling ----

#[test]
fn test_user_scroll_viewport_clamps() {
    let term = terminal(10, 3, 10);
    term.process_output("0\r\n1\r\n2\r\n3\r\n4\r\n5");
    assert_eq!(term.view_start_index(), 3);
    let scrolls = record_scrolls(&term);

    term.user_scroll_viewport(100);
    assert_eq!(term.visible_start_index(), 3);
    assert_eq!(term.rows_scrolled_back(), 0);

    term.user_scroll_viewport(0);
    assert_eq!(term.visible_start_index(), 0);
    assert_eq!(term.rows_scrolled_back(), 3);
    assert_eq!(term.snapshot().to_text(), "0\n1\n2\n");

    term.user_scroll_viewport(-7);
    assert_eq!(term.visible_start_index(), 0);

    term.user_scroll_viewport(2);
    assert_eq!(term.visible_viewport().top(), 2);

    // User scrolling is not a content change
    assert!(scrolls.lock().unwrap().is_empty());
}

#[test]
fn test_input_snaps_to_bottom() {
    let term = terminal(10, 3, 10);
    term.process_output("0\r\n1\r\n2\r\n3\r\n4\r\n5");
    term.user_scroll_viewport(0);
    let scrolls = record_scrolls(&term);

    term.send_key_event(vk::UP, 0, ControlKeyStates::empty());

    assert_eq!(term.visible_start_index(), term.view_start_index());
    assert_eq!(*scrolls.lock().unwrap(), vec![(3, 3, 6)]);

    // Already at the bottom: nothing to report
    term.try_snap_on_input();
    assert_eq!(scrolls.lock().unwrap().len(), 1);
}

#[test]
fn test_snap_on_input_disabled() {
    let settings = CoreSettings {
        initial_cols: 10,
        initial_rows: 3,
        history_size: 10,
        snap_on_input: false,
        ..Default::default()
    };
    let term = Terminal::from_settings(&settings, Arc::new(NullRenderTarget)).unwrap();
    term.process_output("0\r\n1\r\n2\r\n3\r\n4\r\n5");
    term.user_scroll_viewport(0);

    term.try_snap_on_input();
    assert_eq!(term.visible_start_index(), 0);
}

// ---- Input ----

#[test]
fn test_ctrl_h_resolves_to_backspace() {
    let term = terminal(10, 3, 0);
    let events = recording_encoder(&term, true);

    assert!(term.send_key_event(vk::KEY_H, 0x23, ControlKeyStates::LEFT_CTRL));

    let events = events.lock().unwrap();
    assert_eq!(events[0].character(), Some('\x08'));
    assert_eq!(events[0].virtual_key(), vk::KEY_H);
    assert_eq!(events[0].scan_code(), 0x23);
}

#[test]
fn test_key_events_carry_zero_repeat_count() {
    let term = terminal(10, 3, 0);
    let events = recording_encoder(&term, true);

    term.send_key_event(vk::UP, 0x48, ControlKeyStates::empty());

    let events = events.lock().unwrap();
    assert!(events[0].is_key_down());
    assert_eq!(events[0].repeat_count(), 0);
}

#[test]
fn test_alt_space_is_not_substituted() {
    let term = terminal(10, 3, 0);
    let events = recording_encoder(&term, true);

    assert!(!term.send_key_event(vk::SPACE, 0x39, ControlKeyStates::LEFT_ALT));
    assert_eq!(events.lock().unwrap()[0].character(), None);
}

#[test]
fn test_ctrl_space_and_escape_are_substituted() {
    let term = terminal(10, 3, 0);
    let events = recording_encoder(&term, true);

    assert!(term.send_key_event(vk::SPACE, 0x39, ControlKeyStates::RIGHT_CTRL));
    assert!(term.send_key_event(vk::ESCAPE, 0x01, ControlKeyStates::empty()));

    let events = events.lock().unwrap();
    assert_eq!(events[0].character(), Some(' '));
    assert_eq!(events[1].character(), Some('\x1b'));
}

#[test]
fn test_untranslated_key_is_not_consumed() {
    let term = terminal(10, 3, 0);
    recording_encoder(&term, false);

    // Substituted, but the encoder declined it
    assert!(!term.send_key_event(vk::ESCAPE, 0x01, ControlKeyStates::empty()));
}

#[test]
fn test_default_encoder_writes_input() {
    let term = terminal(10, 3, 0);
    let input = record_input(&term);

    // Translated, but no character was substituted
    assert!(!term.send_key_event(vk::UP, 0, ControlKeyStates::empty()));
    assert!(term.send_key_event(0x58, 0, ControlKeyStates::LEFT_ALT));
    assert!(term.send_key_event(vk::KEY_H, 0, ControlKeyStates::LEFT_CTRL));

    term.set_cursor_keys_mode(true);
    term.send_key_event(vk::UP, 0, ControlKeyStates::empty());

    assert_eq!(*input.lock().unwrap(), "\x1b[A\x1bx\x08\x1bOA");
}

#[test]
fn test_send_char_event() {
    let term = terminal(10, 3, 0);
    let input = record_input(&term);

    assert!(term.send_char_event('x'));
    assert!(term.send_char_event('ü'));
    assert!(!term.send_char_event('\0'));
    assert_eq!(*input.lock().unwrap(), "xü");
}

#[test]
fn test_input_without_callback_is_noop() {
    let term = terminal(10, 3, 0);
    assert!(term.send_char_event('x'));
    term.set_write_input_callback(None);
    assert!(term.send_char_event('y'));
}

// ---- Title, colors, cursor ----

#[test]
fn test_title_changes_notify() {
    let term = terminal(10, 3, 0);
    let titles = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&titles);
    term.set_title_changed_callback(Some(Box::new(move |title| {
        sink.lock().unwrap().push(title.to_string());
    })));

    term.set_title("vim");
    assert_eq!(term.title(), "vim");
    assert_eq!(*titles.lock().unwrap(), vec!["vim".to_string()]);
}

#[test]
fn test_suppressed_application_title() {
    let settings = CoreSettings {
        suppress_application_title: true,
        starting_title: "my shell".to_string(),
        ..Default::default()
    };
    let term = Terminal::from_settings(&settings, Arc::new(NullRenderTarget)).unwrap();
    assert_eq!(term.title(), "my shell");

    term.set_title("application title");
    assert_eq!(term.title(), "my shell");
}

#[test]
fn test_background_callback_uses_colorref() {
    let term = terminal(10, 3, 0);
    let colors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&colors);
    term.set_background_callback(Some(Box::new(move |color| sink.lock().unwrap().push(color))));

    term.set_default_background(Rgba::rgb(0x11, 0x22, 0x33));

    assert_eq!(*colors.lock().unwrap(), vec![0x0033_2211]);
    assert_eq!(term.lock_for_reading().default_background(), Rgba::rgb(0x11, 0x22, 0x33));
}

#[test]
fn test_color_table_entries() {
    let term = terminal(10, 3, 0);
    assert!(term.set_color_table_entry(5, Rgba::rgb(1, 2, 3)));
    assert!(!term.set_color_table_entry(256, Rgba::rgb(1, 2, 3)));

    let state = term.lock_for_reading();
    assert_eq!(state.color_table().get(5), Rgba::rgb(1, 2, 3));
    assert!(state.color_table().entries().iter().all(|c| c.a == 0xff));
}

#[test]
fn test_cursor_visibility() {
    let term = terminal(10, 3, 0);
    assert!(term.is_cursor_blinking_allowed());
    term.set_cursor_visible(false);
    assert!(!term.snapshot().cursor.visible);
}

#[test]
fn test_from_settings_applies_settings() {
    let settings = CoreSettings {
        initial_cols: 40,
        initial_rows: 10,
        history_size: 100,
        copy_on_select: true,
        word_delimiters: " ,".to_string(),
        ..Default::default()
    };
    let term = Terminal::from_settings(&settings, Arc::new(NullRenderTarget)).unwrap();

    assert_eq!(term.mutable_viewport().dimensions(), Size::new(40, 10));
    let state = term.lock_for_reading();
    assert_eq!(state.buffer().height(), 110);
    assert!(state.is_copy_on_select_enabled());
    assert_eq!(state.word_delimiters(), " ,");
    assert_eq!(state.default_foreground(), settings.default_foreground);
}

#[test]
fn test_snapshot_json() {
    let term = terminal(10, 3, 0);
    term.set_title("snap");
    term.process_output("hi");

    let json = term.snapshot().to_json().unwrap();
    assert!(json.contains("\"title\": \"snap\""));
    assert!(json.contains("\"text\": \"hi\""));
}
