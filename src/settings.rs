//! Core settings
//!
//! Everything the terminal core takes from the host's settings: colors,
//! cursor style, selection and title policy, initial size and history. The
//! terminal copies these values in; it never keeps a reference to the
//! settings object.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{CursorType, Rgba, ANSI_COLORS, CAMPBELL, DEFAULT_CURSOR_SIZE};

/// Cursor shape as named in settings files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorStyle {
    /// Height follows the cursor height percentage
    Vintage,
    #[default]
    Bar,
    Underscore,
    FilledBox,
    EmptyBox,
}

impl From<CursorStyle> for CursorType {
    fn from(style: CursorStyle) -> Self {
        match style {
            CursorStyle::Vintage => CursorType::Legacy,
            CursorStyle::Bar => CursorType::VerticalBar,
            CursorStyle::Underscore => CursorType::Underscore,
            CursorStyle::FilledBox => CursorType::FullBox,
            CursorStyle::EmptyBox => CursorType::EmptyBox,
        }
    }
}

/// Settings consumed by the terminal core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSettings {
    pub default_foreground: Rgba,
    pub default_background: Rgba,
    pub cursor_shape: CursorStyle,
    /// Cursor height as a percentage of the cell
    pub cursor_height: u32,
    pub cursor_color: Rgba,
    /// The 16 ANSI color table entries
    pub color_table: [Rgba; ANSI_COLORS],
    /// Characters that end a word for selection
    pub word_delimiters: String,
    /// Scroll back to the live output on any input
    pub snap_on_input: bool,
    pub copy_on_select: bool,
    /// Ignore titles set by applications
    pub suppress_application_title: bool,
    pub starting_title: String,
    pub initial_cols: i32,
    pub initial_rows: i32,
    /// Scrollback rows kept above the viewport
    pub history_size: i32,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            default_foreground: Rgba::rgb(204, 204, 204),
            default_background: Rgba::rgb(12, 12, 12),
            cursor_shape: CursorStyle::Bar,
            cursor_height: DEFAULT_CURSOR_SIZE,
            cursor_color: Rgba::rgb(255, 255, 255),
            color_table: CAMPBELL,
            word_delimiters: " /\\()\"'-.,:;<>~!@#$%^&*|+=[]{}~?\u{2502}".to_string(),
            snap_on_input: true,
            copy_on_select: false,
            suppress_application_title: false,
            starting_title: String::new(),
            initial_cols: 120,
            initial_rows: 30,
            history_size: 9001,
        }
    }
}

impl CoreSettings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: CoreSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load settings from the default location or fall back to defaults
    pub fn load_or_default() -> Self {
        // ~/.config/termcore/settings.json
        if let Some(path) = settings_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!(path = %path.display(), "ignoring settings file: {e}"),
                }
            }
        }
        Self::default()
    }
}

fn settings_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("termcore")
            .join("settings.json")
    })
}

/// Settings error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
