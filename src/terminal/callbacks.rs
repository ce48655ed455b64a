//! Host callbacks
//!
//! Each slot holds at most one handler and may be replaced at any time.
//! Every call site is a no-op while its slot is empty. Handlers run on the
//! mutating thread with the terminal's write lock held, so they must not call
//! back into the terminal. A handler that panics is logged and otherwise
//! ignored.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

/// Receives text the application should read as input
pub type WriteInputCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Receives the new window title
pub type TitleChangedCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Receives (visible top, visible height, buffer height)
pub type ScrollPositionChangedCallback = Box<dyn Fn(usize, usize, usize) + Send + Sync>;

/// Receives the new background color as `0x00BBGGRR`
pub type BackgroundColorChangedCallback = Box<dyn Fn(u32) + Send + Sync>;

#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) write_input: Option<WriteInputCallback>,
    pub(crate) title_changed: Option<TitleChangedCallback>,
    pub(crate) scroll_position_changed: Option<ScrollPositionChangedCallback>,
    pub(crate) background_color_changed: Option<BackgroundColorChangedCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("write_input", &self.write_input.is_some())
            .field("title_changed", &self.title_changed.is_some())
            .field("scroll_position_changed", &self.scroll_position_changed.is_some())
            .field("background_color_changed", &self.background_color_changed.is_some())
            .finish()
    }
}

impl Callbacks {
    pub(crate) fn write_input(&self, text: &str) {
        if let Some(handler) = &self.write_input {
            guarded("write_input", || handler(text));
        }
    }

    pub(crate) fn title_changed(&self, title: &str) {
        if let Some(handler) = &self.title_changed {
            guarded("title_changed", || handler(title));
        }
    }

    pub(crate) fn scroll_position_changed(&self, top: usize, height: usize, buffer_height: usize) {
        if let Some(handler) = &self.scroll_position_changed {
            guarded("scroll_position_changed", || handler(top, height, buffer_height));
        }
    }

    pub(crate) fn background_color_changed(&self, color: u32) {
        if let Some(handler) = &self.background_color_changed {
            guarded("background_color_changed", || handler(color));
        }
    }
}

/// Run a host handler, swallowing any panic
fn guarded(callback: &'static str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!(callback, "host callback panicked");
    }
}
