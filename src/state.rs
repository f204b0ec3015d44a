//! Application state management for markbar
//!
//! The open [`Document`] with its undo history, the user settings, and
//! transient UI flags, bundled in [`AppState`].

use crate::config::{load_config, save_config_silent, Settings, ViewMode};
use crate::editor::EditorBuffer;
use crate::error::{Error, Result};
use crate::markdown::continue_list_on_newline;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of undo steps kept per document.
const MAX_UNDO_SIZE: usize = 100;

/// How long toast messages stay visible, in seconds.
const TOAST_DURATION_SECS: f64 = 3.0;

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// Text and selection at one point of the edit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub selection: (usize, usize),
}

/// The document being edited.
#[derive(Debug, Clone)]
pub struct Document {
    /// File path (None for unsaved/new documents)
    pub path: Option<PathBuf>,
    pub buffer: EditorBuffer,
    /// Content as last loaded or saved
    original_content: String,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Incremented when the text is replaced from outside the editor widget
    content_version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty, unsaved document.
    pub fn new() -> Self {
        Self::with_content(None, String::new())
    }

    fn with_content(path: Option<PathBuf>, content: String) -> Self {
        Self {
            path,
            buffer: EditorBuffer::new(content.clone()).with_newline_hook(continue_list_on_newline),
            original_content: content,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            content_version: 0,
        }
    }

    /// Load the document at `path`.
    ///
    /// A missing file yields an empty document that will be created there on
    /// the first save.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Creating new document: {}", path.display());
            return Ok(Self::with_content(Some(path.to_path_buf()), String::new()));
        }

        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Opened document: {}", path.display());
        Ok(Self::with_content(Some(path.to_path_buf()), content))
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Check if the document has unsaved changes.
    pub fn is_modified(&self) -> bool {
        self.buffer.text() != self.original_content
    }

    /// Display title: the file name, with `*` when modified.
    pub fn title(&self) -> String {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled");

        if self.is_modified() {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    /// Save to the document's own path.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            Error::Application("No file path set. Use 'Save As' instead.".to_string())
        })?;
        self.write_to(&path)
    }

    /// Save to `path` and make it the document's path.
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    fn write_to(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, self.buffer.text()).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.original_content = self.buffer.text().to_string();
        info!("Saved document: {}", path.display());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Undo / Redo
    // ─────────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.buffer.text().to_string(),
            selection: self.buffer.selection(),
        }
    }

    /// Record an edit that already happened; `before` is the state prior to it.
    ///
    /// Both the editor widget and the toolbar actions modify the buffer
    /// directly, so the host snapshots first and records afterwards.
    pub fn record_edit(&mut self, before: Snapshot) {
        if before.text != self.buffer.text() {
            self.undo_stack.push(before);
            if self.undo_stack.len() > MAX_UNDO_SIZE {
                self.undo_stack.remove(0);
            }
            self.redo_stack.clear();
        }
    }

    /// Undo the last edit. Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(self.snapshot());
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit. Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(self.snapshot());
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.buffer.set_text(snapshot.text);
        self.buffer
            .set_selection(snapshot.selection.0, snapshot.selection.1);
        self.content_version = self.content_version.wrapping_add(1);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub show_error_modal: bool,
    pub error_message: String,
    /// Temporary message shown in the status bar
    pub toast_message: Option<String>,
    /// When the toast expires (seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state.
#[derive(Debug)]
pub struct AppState {
    pub document: Document,
    pub settings: Settings,
    pub ui: UiState,
    /// Current view mode; starts from the configured default
    pub view_mode: ViewMode,
    settings_dirty: bool,
}

impl AppState {
    /// Load settings from the config file and reopen the last document.
    pub fn new() -> Self {
        let settings = load_config();
        debug!(
            "Theme: {:?}, View mode: {:?}",
            settings.theme, settings.view_mode
        );
        let mut state = Self::with_settings(settings);

        if let Some(path) = state.settings.last_document.clone() {
            if path.exists() {
                match Document::load(&path) {
                    Ok(document) => state.document = document,
                    Err(e) => warn!("Could not reopen '{}': {}", path.display(), e),
                }
            }
        }
        state
    }

    /// Create state with custom settings and an empty document.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            document: Document::new(),
            view_mode: settings.view_mode,
            settings,
            ui: UiState::default(),
            settings_dirty: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the current document with a fresh, unsaved one.
    pub fn new_document(&mut self) {
        self.save_before_leaving();
        self.document = Document::new();
        self.view_mode = ViewMode::Edit;
    }

    /// Open `path`, saving the current document first.
    pub fn open_document(&mut self, path: &Path) -> Result<()> {
        let document = Document::load(path)?;
        self.save_before_leaving();
        self.document = document;
        self.view_mode = self.settings.view_mode;
        self.remember_document(path.to_path_buf());
        Ok(())
    }

    pub fn save_document(&mut self) -> Result<()> {
        self.document.save()?;
        if let Some(path) = self.document.path.clone() {
            self.remember_document(path);
        }
        Ok(())
    }

    pub fn save_document_as(&mut self, path: PathBuf) -> Result<()> {
        self.document.save_as(path.clone())?;
        self.remember_document(path);
        Ok(())
    }

    /// Save a modified document that has a path; failures are only logged.
    fn save_before_leaving(&mut self) {
        if self.document.path.is_some() && self.document.is_modified() {
            if let Err(e) = self.document.save() {
                warn!("Failed to save document before leaving it: {}", e);
            }
        }
    }

    fn remember_document(&mut self, path: PathBuf) {
        self.settings.add_recent_file(path.clone());
        self.settings.last_document = Some(path);
        self.settings_dirty = true;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark them as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to the config file if modified.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.is_settings_dirty() {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    pub fn show_toast(&mut self, message: impl Into<String>, now: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(now + TOAST_DURATION_SECS);
    }

    /// Clear the toast once it has expired.
    pub fn update_toast(&mut self, now: f64) {
        if matches!(self.ui.toast_expires_at, Some(t) if now >= t) {
            self.ui.toast_message = None;
            self.ui.toast_expires_at = None;
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
