//! Modal dialogs requested by the toolbar actions.
//!
//! [`UiDialogs`] implements [`DialogFactory`]: a request only stores an
//! [`ActionDialog`], which the app draws every frame until it produces a
//! [`DialogResult`] or is dismissed.

use crate::actions::{DialogFactory, DialogResult, LinkKind};
use crate::editor::EditorKey;
use crate::error::Result;
use crate::files::dialogs::{pick_folder_dialog, pick_link_target_dialog};
use crate::files::{format_date_time, Snippet};
use crate::markdown::links::is_web_url;
use crate::markdown::{filter_headings, HeadingEntry, MAX_TABLE_COLUMNS, MIN_TABLE_COLUMNS};
use chrono::Local;
use eframe::egui::{self, Color32, Key, RichText};
use log::debug;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Formats offered by the date/time dialog.
const DATE_TIME_PRESETS: &[&str] = &[
    "%Y-%m-%d",
    "%H:%M",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y",
    "%A, %d %B %Y",
    "%Y-%m-%dT%H:%M:%S",
    "%s",
];

/// State of an open action dialog.
#[derive(Debug, Clone)]
pub enum ActionDialog {
    TableRow {
        cols: usize,
        header: bool,
    },
    Headline {
        headings: Vec<HeadingEntry>,
        disabled: BTreeSet<usize>,
        filter: String,
    },
    InsertLink {
        kind: LinkKind,
        title: String,
        target: String,
        /// Folder the file browser starts in
        base_dir: Option<PathBuf>,
    },
    DateTime {
        format: String,
    },
    SpecialKey,
    Snippets {
        snippets: Vec<Snippet>,
        filter: String,
    },
}

/// What a dialog produced this frame.
#[derive(Debug, Default)]
pub struct DialogResponse {
    pub result: Option<DialogResult>,
    /// The dialog should be removed
    pub close: bool,
    /// A new snippet folder was picked
    pub snippet_dir: Option<PathBuf>,
}

impl DialogResponse {
    fn finish(result: DialogResult) -> Self {
        Self {
            result: Some(result),
            close: true,
            snippet_dir: None,
        }
    }

    fn cancel() -> Self {
        Self {
            close: true,
            ..Self::default()
        }
    }
}

impl ActionDialog {
    pub fn title(&self) -> &'static str {
        match self {
            ActionDialog::TableRow { .. } => "Insert table row",
            ActionDialog::Headline { .. } => "Table of contents",
            ActionDialog::InsertLink { kind, .. } => kind.title(),
            ActionDialog::DateTime { .. } => "Date and time",
            ActionDialog::SpecialKey => "Special key",
            ActionDialog::Snippets { .. } => "Insert snippet",
        }
    }

    /// Draw the dialog and return what the user did.
    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool) -> DialogResponse {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            return DialogResponse::cancel();
        }

        let bg_color = if is_dark {
            Color32::from_rgb(40, 40, 45)
        } else {
            Color32::from_rgb(250, 250, 250)
        };
        let border_color = if is_dark {
            Color32::from_rgb(70, 70, 80)
        } else {
            Color32::from_rgb(180, 180, 190)
        };
        let muted = if is_dark {
            Color32::from_rgb(150, 150, 160)
        } else {
            Color32::from_rgb(100, 100, 110)
        };

        let mut response = DialogResponse::default();
        let title = self.title();

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .rounding(8.0),
            )
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.add_space(4.0);
                response = match self {
                    ActionDialog::TableRow { cols, header } => show_table_row(ui, cols, header),
                    ActionDialog::Headline {
                        headings,
                        disabled,
                        filter,
                    } => show_headline(ui, headings, disabled, filter, muted),
                    ActionDialog::InsertLink {
                        kind,
                        title,
                        target,
                        base_dir,
                    } => show_insert_link(ui, *kind, title, target, base_dir.clone()),
                    ActionDialog::DateTime { format } => show_date_time(ui, format, muted),
                    ActionDialog::SpecialKey => show_special_key(ui),
                    ActionDialog::Snippets { snippets, filter } => {
                        show_snippets(ui, snippets, filter, muted)
                    }
                };
            });

        response
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Individual dialogs
// ─────────────────────────────────────────────────────────────────────────────

/// OK / Cancel row; returns (ok, cancel).
fn button_row(ui: &mut egui::Ui, ok_label: &str, ok_enabled: bool) -> (bool, bool) {
    let mut ok = false;
    let mut cancel = false;
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ok = ui
                .add_enabled(ok_enabled, egui::Button::new(ok_label))
                .clicked();
            cancel = ui.button("Cancel").clicked();
        });
    });
    (ok, cancel)
}

/// Right-aligned Cancel button for dialogs that finish on selection.
fn cancel_button(ui: &mut egui::Ui) -> bool {
    ui.add_space(8.0);
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        ui.button("Cancel").clicked()
    })
    .inner
}

fn show_table_row(ui: &mut egui::Ui, cols: &mut usize, header: &mut bool) -> DialogResponse {
    ui.horizontal(|ui| {
        ui.label("Columns:");
        ui.add(egui::DragValue::new(cols).clamp_range(MIN_TABLE_COLUMNS..=MAX_TABLE_COLUMNS));
    });
    ui.checkbox(header, "Header row");

    let enter = ui.input(|i| i.key_pressed(Key::Enter));
    let (ok, cancel) = button_row(ui, "Insert", true);
    if ok || enter {
        DialogResponse::finish(DialogResult::InsertTableRow {
            cols: (*cols).clamp(MIN_TABLE_COLUMNS, MAX_TABLE_COLUMNS),
            header: *header,
        })
    } else if cancel {
        DialogResponse::cancel()
    } else {
        DialogResponse::default()
    }
}

fn show_headline(
    ui: &mut egui::Ui,
    headings: &[HeadingEntry],
    disabled: &mut BTreeSet<usize>,
    filter: &mut String,
    muted: Color32,
) -> DialogResponse {
    let mut response = DialogResponse::default();

    ui.horizontal(|ui| {
        for level in 1..=6 {
            let mut shown = !disabled.contains(&level);
            if ui.toggle_value(&mut shown, format!("H{}", level)).changed() {
                if shown {
                    disabled.remove(&level);
                } else {
                    disabled.insert(level);
                }
                response.result = Some(DialogResult::HeadingLevelToggled {
                    level,
                    disabled: !shown,
                });
            }
        }
    });
    ui.add(egui::TextEdit::singleline(filter).hint_text("Filter"));
    ui.add_space(4.0);

    let needle = filter.to_lowercase();
    let visible: Vec<&HeadingEntry> = filter_headings(headings, disabled)
        .into_iter()
        .filter(|h| needle.is_empty() || h.title.to_lowercase().contains(&needle))
        .collect();

    egui::ScrollArea::vertical()
        .max_height(320.0)
        .show(ui, |ui| {
            if visible.is_empty() {
                ui.label(RichText::new("No headings").color(muted));
            }
            for heading in visible {
                let indent = (heading.level.saturating_sub(1)) as f32 * 12.0;
                ui.horizontal(|ui| {
                    ui.add_space(indent);
                    if ui.selectable_label(false, &heading.title).clicked() {
                        response.result = Some(DialogResult::JumpToHeading {
                            offset: heading.offset,
                        });
                        response.close = true;
                    }
                });
            }
        });

    if cancel_button(ui) {
        response.close = true;
    }
    response
}

fn show_insert_link(
    ui: &mut egui::Ui,
    kind: LinkKind,
    title: &mut String,
    target: &mut String,
    base_dir: Option<PathBuf>,
) -> DialogResponse {
    egui::Grid::new("insert_link_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Title:");
            ui.add(egui::TextEdit::singleline(title).desired_width(240.0));
            ui.end_row();

            ui.label("Target:");
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(target)
                        .hint_text("https://… or file")
                        .desired_width(180.0),
                );
                if ui.button("Browse…").clicked() {
                    if let Some(path) = pick_link_target_dialog(kind, base_dir.as_deref()) {
                        if title.is_empty() {
                            if let Some(stem) = path.file_stem() {
                                *title = stem.to_string_lossy().into_owned();
                            }
                        }
                        *target = path.to_string_lossy().into_owned();
                    }
                }
            });
            ui.end_row();
        });

    let preview = kind.format(title, target.trim());
    ui.add_space(4.0);
    ui.label(RichText::new(preview).monospace());

    let enter = ui.input(|i| i.key_pressed(Key::Enter));
    let can_insert = !target.trim().is_empty();
    let (ok, cancel) = button_row(ui, "Insert", can_insert);
    if (ok || enter) && can_insert {
        DialogResponse::finish(DialogResult::InsertLink {
            kind,
            title: title.clone(),
            target: target.trim().to_string(),
        })
    } else if cancel {
        DialogResponse::cancel()
    } else {
        DialogResponse::default()
    }
}

fn show_date_time(ui: &mut egui::Ui, format: &mut String, muted: Color32) -> DialogResponse {
    let now = Local::now();
    let mut response = DialogResponse::default();

    for preset in DATE_TIME_PRESETS {
        if let Some(example) = format_date_time(preset, now) {
            if ui
                .selectable_label(false, &example)
                .on_hover_text(*preset)
                .clicked()
            {
                response = DialogResponse::finish(DialogResult::InsertDateTime {
                    format: preset.to_string(),
                });
            }
        }
    }

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Format:");
        ui.text_edit_singleline(format);
    });
    let preview = format_date_time(format, now);
    match &preview {
        Some(text) => ui.label(RichText::new(text).monospace()),
        None => ui.label(RichText::new("Invalid format").color(muted)),
    };

    let (ok, cancel) = button_row(ui, "Insert", preview.is_some());
    if ok {
        response = DialogResponse::finish(DialogResult::InsertDateTime {
            format: format.clone(),
        });
    } else if cancel {
        response = DialogResponse::cancel();
    }
    response
}

fn show_special_key(ui: &mut egui::Ui) -> DialogResponse {
    let mut response = DialogResponse::default();
    egui::Grid::new("special_key_grid")
        .num_columns(2)
        .show(ui, |ui| {
            for (i, key) in EditorKey::all().iter().enumerate() {
                if ui.button(key.label()).clicked() {
                    response = DialogResponse::finish(DialogResult::SpecialKey(*key));
                }
                if i % 2 == 1 {
                    ui.end_row();
                }
            }
        });
    if cancel_button(ui) {
        response = DialogResponse::cancel();
    }
    response
}

fn show_snippets(
    ui: &mut egui::Ui,
    snippets: &[Snippet],
    filter: &mut String,
    muted: Color32,
) -> DialogResponse {
    let mut response = DialogResponse::default();

    ui.add(egui::TextEdit::singleline(filter).hint_text("Filter"));
    let needle = filter.to_lowercase();

    egui::ScrollArea::vertical()
        .max_height(320.0)
        .show(ui, |ui| {
            if snippets.is_empty() {
                ui.label(RichText::new("No snippets found. Choose a snippet folder.").color(muted));
            }
            for snippet in snippets
                .iter()
                .filter(|s| needle.is_empty() || s.name.to_lowercase().contains(&needle))
            {
                if ui.selectable_label(false, &snippet.name).clicked() {
                    response = DialogResponse::finish(DialogResult::InsertSnippet {
                        path: snippet.path.clone(),
                    });
                }
            }
        });

    ui.add_space(4.0);
    if ui.button("📁 Choose folder…").clicked() {
        if let Some(dir) = pick_folder_dialog(None) {
            response.snippet_dir = Some(dir);
            response.close = true;
        }
    }

    if cancel_button(ui) {
        response.close = true;
    }
    response
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog factory
// ─────────────────────────────────────────────────────────────────────────────

/// Dialog host handed to the action dispatcher.
#[derive(Debug, Default)]
pub struct UiDialogs {
    active: Option<ActionDialog>,
    /// Column count the table dialog starts with
    pub table_columns: usize,
    /// Folder of the current document, for the link file browser
    pub base_dir: Option<PathBuf>,
    /// Default for the custom format field of the date dialog
    pub date_format: String,
}

impl UiDialogs {
    pub fn new(table_columns: usize, date_format: String) -> Self {
        Self {
            active: None,
            table_columns,
            base_dir: None,
            date_format,
        }
    }

    #[cfg(test)]
    pub fn active(&self) -> Option<&ActionDialog> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    /// Draw the open dialog, closing it when it asks to be closed.
    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool) -> DialogResponse {
        let Some(dialog) = self.active.as_mut() else {
            return DialogResponse::default();
        };
        let response = dialog.show(ctx, is_dark);
        if let Some(DialogResult::InsertTableRow { cols, .. }) = &response.result {
            self.table_columns = *cols;
        }
        if response.close {
            self.active = None;
        }
        response
    }

    fn open(&mut self, dialog: ActionDialog) {
        debug!("Opening dialog: {}", dialog.title());
        self.active = Some(dialog);
    }
}

impl DialogFactory for UiDialogs {
    fn show_insert_table_row_dialog(&mut self, header: bool) {
        let cols = self.table_columns.clamp(MIN_TABLE_COLUMNS, MAX_TABLE_COLUMNS);
        self.open(ActionDialog::TableRow { cols, header });
    }

    fn show_headline_dialog(&mut self, headings: Vec<HeadingEntry>, disabled_levels: BTreeSet<usize>) {
        self.open(ActionDialog::Headline {
            headings,
            disabled: disabled_levels,
            filter: String::new(),
        });
    }

    fn show_insert_link_dialog(&mut self, kind: LinkKind, title: String) {
        let target = clipboard_url().unwrap_or_default();
        self.open(ActionDialog::InsertLink {
            kind,
            title,
            target,
            base_dir: self.base_dir.clone(),
        });
    }

    fn show_date_time_dialog(&mut self) {
        self.open(ActionDialog::DateTime {
            format: self.date_format.clone(),
        });
    }

    fn show_special_key_dialog(&mut self) {
        self.open(ActionDialog::SpecialKey);
    }

    fn show_snippet_dialog(&mut self, snippets: Vec<Snippet>) {
        self.open(ActionDialog::Snippets {
            snippets,
            filter: String::new(),
        });
    }
}

/// Web URL currently on the clipboard, used to prefill link targets.
fn clipboard_url() -> Option<String> {
    match read_clipboard() {
        Ok(text) => {
            let text = text.trim();
            is_web_url(text).then(|| text.to_string())
        }
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

fn read_clipboard() -> Result<String> {
    let mut clipboard = arboard::Clipboard::new()?;
    Ok(clipboard.get_text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_dialog_starts_with_clamped_columns() {
        let mut dialogs = UiDialogs::new(99, "%Y-%m-%d".into());
        dialogs.show_insert_table_row_dialog(true);
        match dialogs.active() {
            Some(ActionDialog::TableRow { cols, header }) => {
                assert_eq!(*cols, MAX_TABLE_COLUMNS);
                assert!(*header);
            }
            other => panic!("unexpected dialog: {:?}", other),
        }
    }

    #[test]
    fn test_new_request_replaces_open_dialog() {
        let mut dialogs = UiDialogs::new(3, "%H:%M".into());
        dialogs.show_special_key_dialog();
        dialogs.show_date_time_dialog();
        match dialogs.active() {
            Some(ActionDialog::DateTime { format }) => assert_eq!(format, "%H:%M"),
            other => panic!("unexpected dialog: {:?}", other),
        }
        dialogs.close();
        assert!(!dialogs.is_open());
    }

    #[test]
    fn test_headline_dialog_keeps_disabled_levels() {
        let mut dialogs = UiDialogs::default();
        let disabled: BTreeSet<usize> = [3].into_iter().collect();
        dialogs.show_headline_dialog(Vec::new(), disabled.clone());
        assert_eq!(dialogs.active().map(ActionDialog::title), Some("Table of contents"));
        if let Some(ActionDialog::Headline { disabled: d, .. }) = dialogs.active() {
            assert_eq!(d, &disabled);
        }
    }

    #[test]
    fn test_date_presets_are_valid() {
        let now = Local::now();
        for preset in DATE_TIME_PRESETS {
            assert!(format_date_time(preset, now).is_some(), "{}", preset);
        }
    }
}
