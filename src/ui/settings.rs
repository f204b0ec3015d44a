//! Settings Panel Component for markbar
//!
//! A modal window for appearance, editor behavior, and the toolbar layout.
//! Changes apply live; the caller persists them.

use crate::actions::{ActionItem, ActionLayout, MarkdownActions};
use crate::config::{ListMarker, Settings, Theme};
use crate::files::dialogs::pick_folder_dialog;
use crate::files::format_date_time;
use crate::markdown::{MAX_TABLE_COLUMNS, MIN_TABLE_COLUMNS};
use eframe::egui::{self, Color32, RichText, Ui};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Editor,
    Toolbar,
}

impl SettingsSection {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Editor => "Editor",
            SettingsSection::Toolbar => "Toolbar",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Editor => "📝",
            SettingsSection::Toolbar => "🔧",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    pub changed: bool,
    pub close_requested: bool,
    pub reset_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window, editing `settings` in place.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };
        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(520.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);
                        for section in [
                            SettingsSection::Appearance,
                            SettingsSection::Editor,
                            SettingsSection::Toolbar,
                        ] {
                            let text = format!("{} {}", section.icon(), section.label());
                            let btn = ui.add_sized(
                                [110.0, 32.0],
                                egui::SelectableLabel::new(
                                    self.active_section == section,
                                    RichText::new(text).size(14.0),
                                ),
                            );
                            if btn.clicked() {
                                self.active_section = section;
                            }
                        }

                        ui.add_space((ui.available_height() - 40.0).max(8.0));
                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(360.0);
                        ui.set_min_height(340.0);
                        output.changed |= match self.active_section {
                            SettingsSection::Appearance => show_appearance_section(ui, settings),
                            SettingsSection::Editor => show_editor_section(ui, settings),
                            SettingsSection::Toolbar => {
                                show_toolbar_section(ui, &mut settings.action_layout)
                            }
                        };
                    });
                });

                ui.separator();
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }
}

fn section_gap(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);
}

/// Returns true if any setting was changed.
fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label(RichText::new("Theme").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for theme in Theme::all() {
            let label = match theme {
                Theme::Light => "☀ Light",
                Theme::Dark => "🌙 Dark",
                Theme::System => "💻 System",
            };
            changed |= ui
                .selectable_value(&mut settings.theme, *theme, label)
                .changed();
        }
    });

    section_gap(ui);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Font Size").strong());
        ui.add_space(8.0);
        ui.label(format!("{}px", settings.font_size as u32));
    });
    ui.add_space(4.0);
    changed |= ui
        .add(
            egui::Slider::new(
                &mut settings.font_size,
                Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
            )
            .show_value(false)
            .step_by(1.0),
        )
        .changed();
    ui.horizontal(|ui| {
        for (label, size) in [("Small", 12.0), ("Medium", 14.0), ("Large", 18.0)] {
            if ui.small_button(label).clicked() {
                settings.font_size = size;
                changed = true;
            }
        }
    });

    changed
}

/// Returns true if any setting was changed.
fn show_editor_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Editor");
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut settings.word_wrap, "Word Wrap")
        .on_hover_text("Wrap long lines instead of horizontal scrolling")
        .changed();
    ui.add_space(4.0);
    changed |= ui
        .checkbox(&mut settings.renumber_ordered_lists, "Renumber Ordered Lists")
        .on_hover_text("Fix numbering after list edits made from the toolbar")
        .changed();

    section_gap(ui);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Tab Size").strong());
        changed |= ui
            .add(
                egui::DragValue::new(&mut settings.tab_size)
                    .clamp_range(Settings::MIN_TAB_SIZE..=Settings::MAX_TAB_SIZE),
            )
            .changed();
    });
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("List Marker").strong());
        for marker in ListMarker::all() {
            changed |= ui
                .selectable_value(&mut settings.list_marker, *marker, marker.as_str())
                .changed();
        }
    });
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Table Columns").strong());
        changed |= ui
            .add(
                egui::DragValue::new(&mut settings.last_table_columns)
                    .clamp_range(MIN_TABLE_COLUMNS..=MAX_TABLE_COLUMNS),
            )
            .changed();
    });

    section_gap(ui);

    ui.label(RichText::new("Date Format").strong());
    ui.add_space(4.0);
    changed |= ui
        .add(egui::TextEdit::singleline(&mut settings.date_format).desired_width(200.0))
        .changed();
    let preview = format_date_time(&settings.date_format, chrono::Local::now())
        .unwrap_or_else(|| "Invalid format".to_string());
    ui.label(RichText::new(preview).weak().small());

    section_gap(ui);

    ui.label(RichText::new("Snippet Folder").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let current = settings
            .snippet_dir
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "Not set".to_string());
        ui.label(RichText::new(current).monospace());
        if ui.small_button("Choose…").clicked() {
            if let Some(dir) = pick_folder_dialog(settings.snippet_dir.as_deref()) {
                settings.snippet_dir = Some(dir);
                changed = true;
            }
        }
        if settings.snippet_dir.is_some() && ui.small_button("Clear").clicked() {
            settings.snippet_dir = None;
            changed = true;
        }
    });

    changed
}

/// Every action in layout order, hidden ones included.
fn layout_items(layout: &ActionLayout) -> Vec<ActionItem> {
    let unfiltered = ActionLayout {
        order: layout.order.clone(),
        hidden: Vec::new(),
    };
    unfiltered.apply(MarkdownActions::action_list())
}

/// Returns true if the layout was changed.
fn show_toolbar_section(ui: &mut Ui, layout: &mut ActionLayout) -> bool {
    let mut changed = false;

    ui.heading("Toolbar");
    ui.add_space(4.0);
    ui.label(RichText::new("Show, hide and reorder the action buttons").weak());
    ui.add_space(8.0);

    let items = layout_items(layout);
    let last = items.len().saturating_sub(1);
    egui::ScrollArea::vertical()
        .id_source("toolbar_layout")
        .max_height(300.0)
        .show(ui, |ui| {
            for (index, item) in items.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut visible = !layout.is_hidden(item.id);
                    if ui.checkbox(&mut visible, "").changed() {
                        layout.set_hidden(item.id, !visible);
                        changed = true;
                    }
                    ui.add_sized([28.0, 20.0], egui::Label::new(item.icon));
                    ui.label(item.label);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add_enabled(index < last, egui::Button::new("⏷").small()).clicked() {
                            layout.move_item(&items, item.id, 1);
                            changed = true;
                        }
                        if ui.add_enabled(index > 0, egui::Button::new("⏶").small()).clicked() {
                            layout.move_item(&items, item.id, -1);
                            changed = true;
                        }
                    });
                });
            }
        });

    ui.add_space(8.0);
    if ui.button("Restore default toolbar").clicked() {
        *layout = ActionLayout::default();
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId;

    #[test]
    fn test_settings_section_label_and_icon() {
        assert_eq!(SettingsSection::Appearance.label(), "Appearance");
        assert_eq!(SettingsSection::Toolbar.label(), "Toolbar");
        assert_eq!(SettingsSection::Editor.icon(), "📝");
        assert_eq!(SettingsSection::default(), SettingsSection::Appearance);
    }

    #[test]
    fn test_settings_panel_output_default() {
        let output = SettingsPanelOutput::default();
        assert!(!output.changed);
        assert!(!output.close_requested);
        assert!(!output.reset_requested);
    }

    #[test]
    fn test_layout_items_keep_hidden_actions() {
        let mut layout = ActionLayout::default();
        layout.set_hidden(ActionId::Bold, true);

        let items = layout_items(&layout);
        assert_eq!(items.len(), MarkdownActions::action_list().len());
        assert!(items.iter().any(|i| i.id == ActionId::Bold));
        assert!(!layout
            .apply(MarkdownActions::action_list())
            .iter()
            .any(|i| i.id == ActionId::Bold));
    }

    #[test]
    fn test_layout_items_follow_saved_order() {
        let mut layout = ActionLayout::default();
        let items = layout_items(&layout);
        let second = items[1].id;
        layout.move_item(&items, second, -1);

        assert_eq!(layout_items(&layout)[0].id, second);
    }
}
