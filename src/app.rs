//! Main application module for markbar
//!
//! Implements the eframe App trait: the ribbon, the editor and viewer, the
//! action dialogs, and the glue that hands toolbar clicks to
//! [`MarkdownActions`].

use crate::actions::{ActionContext, ActionId, DialogResult, MarkdownActions, Navigator};
use crate::config::{Settings, ViewMode, WindowSize};
use crate::files::dialogs::{open_file_dialog, save_file_dialog};
use crate::state::AppState;
use crate::theme::ThemeManager;
use crate::ui::{DialogResponse, Ribbon, RibbonAction, RibbonContext, SettingsPanel, UiDialogs};
use eframe::egui::{self, Key, Modifiers};
use eframe::egui::text::{CCursor, CCursorRange};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "markbar";

/// Keyboard shortcut actions, collected before the editor consumes input.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    Save,
    SaveAs,
    Open,
    New,
    ToggleViewMode,
    Undo,
    Redo,
    OpenSettings,
    /// Enter in the editor, routed through the buffer for list continuation
    Newline,
    Action(ActionId),
}

/// Navigation requests collected during one dispatch.
#[derive(Debug, Default)]
struct AppNavigator {
    document: Option<PathBuf>,
}

impl Navigator for AppNavigator {
    fn open_url(&mut self, url: &str) {
        info!("Opening URL: {}", url);
        if let Err(e) = open::that(url) {
            warn!("Failed to open '{}': {}", url, e);
        }
    }

    fn open_document(&mut self, path: &Path) {
        self.document = Some(path.to_path_buf());
    }
}

/// Scroll geometry of the editor from the last frame.
#[derive(Debug, Default, Clone, Copy)]
struct ScrollMetrics {
    offset: f32,
    content_height: f32,
    viewport_height: f32,
}

/// The markbar application.
pub struct MarkbarApp {
    state: AppState,
    actions: MarkdownActions,
    ribbon: Ribbon,
    dialogs: UiDialogs,
    theme_manager: ThemeManager,
    settings_panel: SettingsPanel,
    show_settings: bool,
    /// Whether the editor had keyboard focus last frame
    editor_has_focus: bool,
    scroll: ScrollMetrics,
    /// Scroll offset to apply on the next frame
    pending_scroll: Option<f32>,
    last_window_size: Option<egui::Vec2>,
    last_window_pos: Option<egui::Pos2>,
    start_time: std::time::Instant,
}

impl MarkbarApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing {}", APP_NAME);
        Self::with_state(AppState::new())
    }

    fn with_state(state: AppState) -> Self {
        let settings = &state.settings;
        Self {
            ribbon: Ribbon::new(settings.ribbon_collapsed),
            dialogs: UiDialogs::new(settings.last_table_columns, settings.date_format.clone()),
            theme_manager: ThemeManager::new(settings.theme),
            actions: MarkdownActions::new(),
            settings_panel: SettingsPanel::new(),
            show_settings: false,
            state,
            editor_has_focus: false,
            scroll: ScrollMetrics::default(),
            pending_scroll: None,
            last_window_size: None,
            last_window_pos: None,
            start_time: std::time::Instant::now(),
        }
    }

    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn window_title(&self) -> String {
        format!("{} - {}", self.state.document.title(), APP_NAME)
    }

    /// Track window size and position for persistence.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let size_changed = self
            .last_window_size
            .map_or(true, |s| (s - rect.size()).length() > 1.0);
        let pos_changed = self
            .last_window_pos
            .map_or(true, |p| (p - rect.min).length() > 1.0);
        if !(size_changed || pos_changed) {
            return;
        }

        self.last_window_size = Some(rect.size());
        self.last_window_pos = Some(rect.min);
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        self.state.update_settings(|s| {
            s.window_size = WindowSize {
                width: rect.width(),
                height: rect.height(),
                x: Some(rect.min.x),
                y: Some(rect.min.y),
                maximized,
            };
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `f` against the document with an [`ActionContext`], then record
    /// the edit for undo and follow any navigation it requested.
    fn dispatch<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut MarkdownActions, &mut ActionContext<'_>) -> bool,
    {
        self.dialogs.base_dir = self
            .state
            .document
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf);
        self.dialogs.date_format = self.state.settings.date_format.clone();

        let mut navigator = AppNavigator::default();
        let before = self.state.document.snapshot();
        let handled = {
            let document = &mut self.state.document;
            let mut cx = ActionContext {
                editor: &mut document.buffer,
                document_path: document.path.as_deref(),
                settings: &self.state.settings,
                dialogs: &mut self.dialogs,
                navigator: &mut navigator,
            };
            f(&mut self.actions, &mut cx)
        };
        self.state.document.record_edit(before);

        if let Some(path) = navigator.document {
            self.open_path(&path);
        }
        handled
    }

    fn handle_action_click(&mut self, id: ActionId) {
        let handled = self.dispatch(|actions, cx| actions.on_action_click(id, cx));
        debug!("Action {:?} handled: {}", id, handled);
        self.after_action();
    }

    fn handle_action_long_click(&mut self, id: ActionId) {
        let handled = self.dispatch(|actions, cx| actions.on_action_long_click(id, cx));
        if !handled {
            // Actions without a long-press variant behave as a click
            self.handle_action_click(id);
            return;
        }
        self.after_action();
    }

    fn handle_title_click(&mut self) {
        self.dispatch(|actions, cx| actions.run_title_click(cx));
    }

    fn apply_dialog_response(&mut self, response: DialogResponse) {
        if let Some(dir) = response.snippet_dir {
            info!("Snippet folder set to {}", dir.display());
            self.state.update_settings(|s| s.snippet_dir = Some(dir));
            self.handle_action_click(ActionId::InsertSnippet);
        }

        let Some(result) = response.result else {
            return;
        };
        if let DialogResult::InsertTableRow { cols, .. } = result {
            self.state.update_settings(|s| s.last_table_columns = cols);
        }
        self.dispatch(|actions, cx| actions.apply_dialog_result(&result, cx));
        self.after_action();
    }

    /// Keep the caret in view and the editor focused after an action.
    fn after_action(&mut self) {
        if self.state.view_mode == ViewMode::Edit && !self.dialogs.is_open() {
            self.state.document.buffer.request_focus();
        }
        self.scroll_to_caret_if_hidden();
    }

    /// Scroll so the caret line is visible, estimating its position by line.
    fn scroll_to_caret_if_hidden(&mut self) {
        let text = self.state.document.text();
        let caret = self.state.document.buffer.selection_end();
        let total_lines = text.matches('\n').count() + 1;
        let caret_line = text[..caret].matches('\n').count();

        let metrics = self.scroll;
        if metrics.content_height <= 0.0 {
            return;
        }
        let caret_y = metrics.content_height * caret_line as f32 / total_lines as f32;
        let visible = metrics.offset..(metrics.offset + metrics.viewport_height - 20.0);
        if !visible.contains(&caret_y) {
            self.pending_scroll = Some((caret_y - metrics.viewport_height / 2.0).max(0.0));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File operations
    // ─────────────────────────────────────────────────────────────────────────

    fn current_dir(&self) -> Option<PathBuf> {
        self.state
            .document
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .or_else(|| self.state.settings.recent_files.first()?.parent().map(Path::to_path_buf))
    }

    fn open_path(&mut self, path: &Path) {
        match self.state.open_document(path) {
            Ok(()) => {
                let time = self.get_app_time();
                let title = self.state.document.title();
                self.state.show_toast(format!("Opened {}", title), time);
                self.pending_scroll = Some(0.0);
            }
            Err(e) => {
                warn!("Failed to open document: {}", e);
                self.state.show_error(format!("Failed to open document:\n{}", e));
            }
        }
    }

    fn handle_open_file(&mut self) {
        if let Some(path) = open_file_dialog(self.current_dir().as_deref()) {
            self.open_path(&path);
        }
    }

    fn handle_save_file(&mut self) {
        if self.state.document.path.is_none() {
            self.handle_save_as_file();
            return;
        }
        match self.state.save_document() {
            Ok(()) => {
                let time = self.get_app_time();
                self.state.show_toast("Saved", time);
            }
            Err(e) => {
                warn!("Failed to save document: {}", e);
                self.state.show_error(format!("Failed to save:\n{}", e));
            }
        }
    }

    fn handle_save_as_file(&mut self) {
        let default_name = self
            .state
            .document
            .path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or("note.md")
            .to_string();
        let Some(path) = save_file_dialog(self.current_dir().as_deref(), Some(&default_name))
        else {
            return;
        };
        match self.state.save_document_as(path) {
            Ok(()) => {
                let time = self.get_app_time();
                self.state.show_toast("Saved", time);
            }
            Err(e) => {
                warn!("Failed to save document: {}", e);
                self.state.show_error(format!("Failed to save:\n{}", e));
            }
        }
    }

    fn handle_undo(&mut self) {
        let time = self.get_app_time();
        if !self.state.document.undo() {
            self.state.show_toast("Nothing to undo", time);
        }
    }

    fn handle_redo(&mut self) {
        let time = self.get_app_time();
        if !self.state.document.redo() {
            self.state.show_toast("Nothing to redo", time);
        }
    }

    fn handle_toggle_view_mode(&mut self) {
        let mode = self.state.view_mode.toggle();
        self.state.view_mode = mode;
        self.state.update_settings(|s| s.view_mode = mode);
        self.dialogs.close();
        info!("View mode: {:?}", self.state.view_mode);
    }

    fn handle_cycle_theme(&mut self) {
        let theme = self.theme_manager.cycle();
        self.state.update_settings(|s| s.theme = theme);
        let time = self.get_app_time();
        self.state
            .show_toast(format!("Theme: {}", theme.label()), time);
    }

    fn handle_ribbon_action(&mut self, action: RibbonAction) {
        debug!("Ribbon action: {:?}", action);
        match action {
            RibbonAction::New => self.state.new_document(),
            RibbonAction::Open => self.handle_open_file(),
            RibbonAction::Save => self.handle_save_file(),
            RibbonAction::SaveAs => self.handle_save_as_file(),
            RibbonAction::Undo => self.handle_undo(),
            RibbonAction::Redo => self.handle_redo(),
            RibbonAction::Click(id) => self.handle_action_click(id),
            RibbonAction::LongClick(id) => self.handle_action_long_click(id),
            RibbonAction::TitleClick => self.handle_title_click(),
            RibbonAction::ToggleViewMode => self.handle_toggle_view_mode(),
            RibbonAction::CycleTheme => self.handle_cycle_theme(),
            RibbonAction::OpenSettings => self.show_settings = true,
            RibbonAction::ToggleCollapse => {
                self.ribbon.toggle_collapsed();
                let collapsed = self.ribbon.is_collapsed();
                self.state.update_settings(|s| s.ribbon_collapsed = collapsed);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume shortcut keys before the editor widget sees them.
    fn collect_keyboard_action(&self, ctx: &egui::Context) -> Option<KeyboardAction> {
        let editing = self.state.view_mode == ViewMode::Edit;
        let dialog_open = self.dialogs.is_open();
        let editor_focused = self.editor_has_focus;

        ctx.input_mut(|i| {
            if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::S) {
                return Some(KeyboardAction::SaveAs);
            }
            if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z) {
                return Some(KeyboardAction::Redo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::S) {
                return Some(KeyboardAction::Save);
            }
            if i.consume_key(Modifiers::COMMAND, Key::O) {
                return Some(KeyboardAction::Open);
            }
            if i.consume_key(Modifiers::COMMAND, Key::N) {
                return Some(KeyboardAction::New);
            }
            if i.consume_key(Modifiers::COMMAND, Key::E) {
                return Some(KeyboardAction::ToggleViewMode);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Comma) {
                return Some(KeyboardAction::OpenSettings);
            }
            if !editing || dialog_open {
                return None;
            }
            if i.consume_key(Modifiers::COMMAND, Key::Z) {
                return Some(KeyboardAction::Undo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Y) {
                return Some(KeyboardAction::Redo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::B) {
                return Some(KeyboardAction::Action(ActionId::Bold));
            }
            if i.consume_key(Modifiers::COMMAND, Key::I) {
                return Some(KeyboardAction::Action(ActionId::Italic));
            }
            if i.consume_key(Modifiers::COMMAND, Key::K) {
                return Some(KeyboardAction::Action(ActionId::InsertLink));
            }
            if editor_focused && i.consume_key(Modifiers::NONE, Key::Enter) {
                return Some(KeyboardAction::Newline);
            }
            None
        })
    }

    fn handle_keyboard_action(&mut self, action: KeyboardAction) {
        debug!("Keyboard shortcut: {:?}", action);
        match action {
            KeyboardAction::Save => self.handle_save_file(),
            KeyboardAction::SaveAs => self.handle_save_as_file(),
            KeyboardAction::Open => self.handle_open_file(),
            KeyboardAction::New => self.state.new_document(),
            KeyboardAction::ToggleViewMode => self.handle_toggle_view_mode(),
            KeyboardAction::Undo => self.handle_undo(),
            KeyboardAction::Redo => self.handle_redo(),
            KeyboardAction::OpenSettings => self.show_settings = true,
            KeyboardAction::Newline => {
                let document = &mut self.state.document;
                let before = document.snapshot();
                document.buffer.insert_or_replace_text_on_cursor("\n");
                document.record_edit(before);
            }
            KeyboardAction::Action(id) => self.handle_action_click(id),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ribbon(&mut self, ctx: &egui::Context) -> Option<RibbonAction> {
        let items = self
            .state
            .settings
            .action_layout
            .apply(MarkdownActions::action_list());
        let title = self.state.document.title();
        let rcx = RibbonContext {
            title: &title,
            view_mode: self.state.view_mode,
            can_undo: self.state.document.can_undo(),
            can_redo: self.state.document.can_redo(),
            can_save: self.state.document.is_modified() || self.state.document.path.is_none(),
        };

        let mut action = None;
        egui::TopBottomPanel::top("ribbon")
            .exact_height(self.ribbon.height() + 4.0)
            .show(ctx, |ui| {
                action = self.ribbon.show(ui, &items, rcx);
            });
        action
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        let text = self.state.document.text();
        let caret = self.state.document.buffer.selection_end();
        let line = text[..caret].matches('\n').count() + 1;
        let line_start = self.state.document.buffer.line_start(caret);
        let column = text[line_start..caret].chars().count() + 1;

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Ln {}, Col {}", line, column));
                ui.separator();
                ui.label(self.state.view_mode.label());
                if let Some(message) = &self.state.ui.toast_message {
                    ui.separator();
                    ui.label(message);
                }
            });
        });
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        let editing = self.state.view_mode == ViewMode::Edit;
        let font_size = self.state.settings.font_size;
        let word_wrap = self.state.settings.word_wrap;
        let pending_scroll = self.pending_scroll.take();

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut scroll_area = egui::ScrollArea::vertical()
                .id_source("editor_scroll")
                .auto_shrink([false, false]);
            if let Some(offset) = pending_scroll {
                scroll_area = scroll_area.vertical_scroll_offset(offset);
            }

            let document = &mut self.state.document;
            let id = egui::Id::new(("markbar_editor", document.content_version()));
            let output = scroll_area.show(ui, |ui| {
                // Push programmatic selection changes into the widget
                if document.buffer.take_cursor_changed() {
                    let (a, b) = document.buffer.char_selection();
                    let mut state = egui::TextEdit::load_state(ui.ctx(), id).unwrap_or_default();
                    state
                        .cursor
                        .set_char_range(Some(CCursorRange::two(CCursor::new(a), CCursor::new(b))));
                    state.store(ui.ctx(), id);
                }

                let font = egui::FontId::monospace(font_size);
                if editing {
                    let before = document.snapshot();
                    let mut edit = egui::TextEdit::multiline(document.buffer.text_mut())
                        .id(id)
                        .font(font)
                        .lock_focus(true)
                        .desired_width(if word_wrap { ui.available_width() } else { f32::INFINITY })
                        .desired_rows(30);
                    if !word_wrap {
                        edit = edit.clip_text(false);
                    }
                    let output = edit.show(ui);

                    if let Some(range) = output.cursor_range {
                        document.buffer.sync_char_selection(
                            range.secondary.ccursor.index,
                            range.primary.ccursor.index,
                        );
                    }
                    if output.response.changed() {
                        document.record_edit(before);
                    }
                    if document.buffer.take_focus_request() {
                        output.response.request_focus();
                    }
                    output.response.has_focus()
                } else {
                    let mut text: &str = document.buffer.text();
                    egui::TextEdit::multiline(&mut text)
                        .id(id)
                        .font(font)
                        .desired_width(ui.available_width())
                        .frame(false)
                        .show(ui);
                    document.buffer.take_focus_request();
                    false
                }
            });

            self.editor_has_focus = output.inner;
            self.scroll = ScrollMetrics {
                offset: output.state.offset.y,
                content_height: output.content_size.y,
                viewport_height: output.inner_rect.height(),
            };
        });
    }

    fn render_settings_panel(&mut self, ctx: &egui::Context, is_dark: bool) {
        if !self.show_settings {
            return;
        }
        let mut settings = self.state.settings.clone();
        let output = self.settings_panel.show(ctx, &mut settings, is_dark);

        if output.reset_requested {
            settings = Settings {
                recent_files: settings.recent_files,
                last_document: settings.last_document,
                window_size: settings.window_size,
                ..Settings::default()
            };
        }
        if output.changed || output.reset_requested {
            settings.sanitize();
            if settings.theme != self.theme_manager.current_theme() {
                self.theme_manager.set_theme(settings.theme);
            }
            self.ribbon = Ribbon::new(settings.ribbon_collapsed);
            self.dialogs.table_columns = settings.last_table_columns;
            self.state.update_settings(|s| *s = settings);
        }
        if output.close_requested {
            self.show_settings = false;
            self.state.save_settings_if_dirty();
        }
    }

    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if !self.state.ui.show_error_modal {
            return;
        }
        let mut dismissed = false;
        egui::Window::new("⚠ Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&self.state.ui.error_message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.state.dismiss_error();
        }
    }

    /// Save a document that has a path; untitled documents are left alone.
    fn save_on_exit(&mut self) {
        let document = &mut self.state.document;
        if document.path.is_some() && document.is_modified() {
            if let Err(e) = document.save() {
                warn!("Failed to save document on exit: {}", e);
            }
        }
        self.state.save_settings_if_dirty();
    }
}

impl eframe::App for MarkbarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme_manager.apply_if_needed(ctx);

        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        self.update_window_state(ctx);

        // Shortcuts first so Enter and Ctrl+Z never reach the TextEdit
        if let Some(action) = self.collect_keyboard_action(ctx) {
            self.handle_keyboard_action(action);
        }

        if let Some(action) = self.render_ribbon(ctx) {
            self.handle_ribbon_action(action);
        }
        self.render_status_bar(ctx);
        self.render_editor(ctx);

        let is_dark = ctx.style().visuals.dark_mode;
        let response = self.dialogs.show(ctx, is_dark);
        self.apply_dialog_response(response);
        self.render_settings_panel(ctx, is_dark);
        self.render_error_modal(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.save_on_exit();
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}
