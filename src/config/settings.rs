//! User settings and preferences for markbar
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. `Settings` is also what
//! the toolbar actions read through [`DocumentSettings`].

use crate::actions::{ActionLayout, DisplayMode, DocumentSettings};
use crate::markdown::{MAX_TABLE_COLUMNS, MIN_TABLE_COLUMNS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// View Mode Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the document is being edited or only read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Edit,
    View,
}

impl ViewMode {
    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Edit => ViewMode::View,
            ViewMode::View => ViewMode::Edit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Edit => "Edit",
            ViewMode::View => "View",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ViewMode::Edit => "📝",
            ViewMode::View => "👁",
        }
    }

    /// Toolbar display mode matching this view mode.
    pub fn display_mode(&self) -> DisplayMode {
        match self {
            ViewMode::Edit => DisplayMode::Edit,
            ViewMode::View => DisplayMode::View,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// List Marker Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Marker used for new unordered list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ListMarker {
    #[default]
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = "+")]
    Plus,
}

impl ListMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListMarker::Dash => "-",
            ListMarker::Star => "*",
            ListMarker::Plus => "+",
        }
    }

    pub fn all() -> &'static [ListMarker] {
        &[ListMarker::Dash, ListMarker::Star, ListMarker::Plus]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 700.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default, so partial or older config files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    pub theme: Theme,

    /// View mode new documents open in
    pub view_mode: ViewMode,

    /// Font size for the editor (in points)
    pub font_size: f32,

    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Markdown Editing
    // ─────────────────────────────────────────────────────────────────────────
    /// Indent width in spaces, used by indent and deindent
    pub tab_size: u8,

    pub list_marker: ListMarker,

    /// chrono format string for quick date insertion
    pub date_format: String,

    /// Folder holding snippet files
    pub snippet_dir: Option<PathBuf>,

    /// Renumber ordered lists after toggling list prefixes
    pub renumber_ordered_lists: bool,

    /// Column count last chosen in the table dialog
    pub last_table_columns: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Toolbar
    // ─────────────────────────────────────────────────────────────────────────
    /// Order and visibility of the Markdown action buttons
    pub action_layout: ActionLayout,

    pub ribbon_collapsed: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,

    pub max_recent_files: usize,

    /// Document reopened on startup
    pub last_document: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            font_size: 14.0,
            word_wrap: true,

            // Markdown Editing
            tab_size: 4,
            list_marker: ListMarker::default(),
            date_format: String::from("%Y-%m-%d"),
            snippet_dir: None,
            renumber_ordered_lists: true,
            last_table_columns: 3,

            // Toolbar
            action_layout: ActionLayout::default(),
            ribbon_collapsed: false,

            // Session & History
            recent_files: Vec::new(),
            max_recent_files: 10,
            last_document: None,

            // Window State
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const MIN_FONT_SIZE: f32 = 8.0;
    pub const MAX_FONT_SIZE: f32 = 72.0;
    pub const MIN_TAB_SIZE: u8 = 1;
    pub const MAX_TAB_SIZE: u8 = 8;
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Clamp values to valid ranges after loading a hand-edited file.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.tab_size = self.tab_size.clamp(Self::MIN_TAB_SIZE, Self::MAX_TAB_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.last_table_columns = self
            .last_table_columns
            .clamp(MIN_TABLE_COLUMNS, MAX_TABLE_COLUMNS);

        if self.date_format.trim().is_empty() {
            self.date_format = Settings::default().date_format;
        }

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

impl DocumentSettings for Settings {
    fn unordered_list_char(&self) -> &str {
        self.list_marker.as_str()
    }

    fn indent_size(&self) -> usize {
        usize::from(self.tab_size)
    }

    fn date_format(&self) -> &str {
        &self.date_format
    }

    fn snippet_dir(&self) -> Option<&Path> {
        self.snippet_dir.as_deref()
    }

    fn renumber_ordered_lists(&self) -> bool {
        self.renumber_ordered_lists
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.view_mode, ViewMode::Edit);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.list_marker, ListMarker::Dash);
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.last_table_columns, 3);
        assert!(settings.renumber_ordered_lists);
        assert!(settings.recent_files.is_empty());
        assert_eq!(settings.window_size.width, 900.0);
    }

    #[test]
    fn test_recent_notes_are_most_recent_first_and_capped() {
        let mut settings = Settings {
            max_recent_files: 2,
            ..Settings::default()
        };
        let notes: Vec<PathBuf> = ["todo.md", "journal.md", "ideas.md"]
            .iter()
            .map(|name| PathBuf::from("/notes").join(name))
            .collect();

        settings.add_recent_file(notes[0].clone());
        settings.add_recent_file(notes[1].clone());
        settings.add_recent_file(notes[0].clone());
        assert_eq!(settings.recent_files, vec![notes[0].clone(), notes[1].clone()]);

        settings.add_recent_file(notes[2].clone());
        assert_eq!(settings.recent_files, vec![notes[2].clone(), notes[0].clone()]);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"system\"").unwrap(),
            Theme::System
        );
    }

    #[test]
    fn test_list_marker_serializes_as_character() {
        assert_eq!(serde_json::to_string(&ListMarker::Star).unwrap(), "\"*\"");
        assert_eq!(
            serde_json::from_str::<ListMarker>("\"+\"").unwrap(),
            ListMarker::Plus
        );
        assert!(serde_json::from_str::<ListMarker>("\"#\"").is_err());
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::Edit.toggle(), ViewMode::View);
        assert_eq!(ViewMode::View.toggle(), ViewMode::Edit);
        assert_eq!(ViewMode::View.display_mode(), DisplayMode::View);
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            font_size: 200.0,
            tab_size: 0,
            last_table_columns: 500,
            date_format: "  ".into(),
            max_recent_files: 0,
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(settings.tab_size, Settings::MIN_TAB_SIZE);
        assert_eq!(settings.last_table_columns, MAX_TABLE_COLUMNS);
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.max_recent_files, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json_sanitized(r#"{"list_marker": "*", "tab_size": 2}"#).unwrap();
        assert_eq!(settings.list_marker, ListMarker::Star);
        assert_eq!(settings.tab_size, 2);
        assert!(settings.word_wrap);
    }

    #[test]
    fn test_document_settings_view() {
        let settings = Settings {
            list_marker: ListMarker::Plus,
            tab_size: 3,
            snippet_dir: Some(PathBuf::from("/snips")),
            renumber_ordered_lists: false,
            ..Settings::default()
        };
        let view: &dyn DocumentSettings = &settings;

        assert_eq!(view.unordered_list_char(), "+");
        assert_eq!(view.indent_size(), 3);
        assert_eq!(view.snippet_dir(), Some(Path::new("/snips")));
        assert!(!view.renumber_ordered_lists());
    }

    #[test]
    fn test_action_layout_roundtrip() {
        let mut settings = Settings::default();
        settings.action_layout.set_hidden(ActionId::Accordion, true);

        let json = serde_json::to_string(&settings).unwrap();
        let loaded = Settings::from_json_sanitized(&json).unwrap();
        assert!(loaded.action_layout.is_hidden(ActionId::Accordion));
        assert_eq!(loaded, settings);
    }
}
