//! Ribbon UI Component for markbar
//!
//! A single row of icon buttons: file and edit controls on the left, the
//! document title, and the Markdown action buttons for the current view
//! mode. Secondary click or a long touch on an action button triggers its
//! long-press variant.

use crate::actions::{ActionId, ActionItem, DisplayMode};
use crate::config::ViewMode;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the ribbon in expanded state.
const RIBBON_HEIGHT_EXPANDED: f32 = 40.0;

/// Height of the ribbon in collapsed state.
const RIBBON_HEIGHT_COLLAPSED: f32 = 28.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibbonAction {
    New,
    Open,
    Save,
    SaveAs,
    Undo,
    Redo,

    /// A toolbar action was clicked
    Click(ActionId),
    /// A toolbar action was secondary-clicked or long-touched
    LongClick(ActionId),
    /// The document title was clicked
    TitleClick,

    ToggleViewMode,
    CycleTheme,
    OpenSettings,
    ToggleCollapse,
}

/// Ribbon UI state and rendering.
#[derive(Debug, Clone, Default)]
pub struct Ribbon {
    /// Collapsed ribbons hide the action buttons.
    collapsed: bool,
}

/// What the ribbon needs to know about the document this frame.
#[derive(Debug, Clone, Copy)]
pub struct RibbonContext<'a> {
    pub title: &'a str,
    pub view_mode: ViewMode,
    pub can_undo: bool,
    pub can_redo: bool,
    pub can_save: bool,
}

impl Ribbon {
    pub fn new(collapsed: bool) -> Self {
        Self { collapsed }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn height(&self) -> f32 {
        if self.collapsed {
            RIBBON_HEIGHT_COLLAPSED
        } else {
            RIBBON_HEIGHT_EXPANDED
        }
    }

    /// Render the ribbon and return any triggered action.
    ///
    /// `items` is the user-ordered action list; only the ones visible in the
    /// current view mode are drawn.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        items: &[ActionItem],
        rcx: RibbonContext<'_>,
    ) -> Option<RibbonAction> {
        let mut action: Option<RibbonAction> = None;
        let is_dark = ui.visuals().dark_mode;

        let ribbon_bg = if is_dark {
            Color32::from_rgb(40, 40, 40)
        } else {
            Color32::from_rgb(248, 248, 248)
        };
        let separator_color = if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };
        let muted = if is_dark {
            Color32::from_rgb(150, 150, 150)
        } else {
            Color32::from_rgb(110, 110, 110)
        };

        ui.painter()
            .rect_filled(ui.available_rect_before_wrap(), 0.0, ribbon_bg);

        ui.horizontal(|ui| {
            ui.set_height(self.height());
            ui.spacing_mut().item_spacing.x = 2.0;

            let collapse_icon = if self.collapsed { "▶" } else { "◀" };
            let collapse_tooltip = if self.collapsed {
                "Expand ribbon"
            } else {
                "Collapse ribbon"
            };
            if icon_button(ui, collapse_icon, collapse_tooltip, true, is_dark).clicked() {
                action = Some(RibbonAction::ToggleCollapse);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // File
            if icon_button(ui, "📄", "New (Ctrl+N)", true, is_dark).clicked() {
                action = Some(RibbonAction::New);
            }
            if icon_button(ui, "📂", "Open File (Ctrl+O)", true, is_dark).clicked() {
                action = Some(RibbonAction::Open);
            }
            if icon_button(ui, "💾", "Save (Ctrl+S)", rcx.can_save, is_dark).clicked() {
                action = Some(RibbonAction::Save);
            }
            if icon_button(ui, "📥", "Save As (Ctrl+Shift+S)", true, is_dark).clicked() {
                action = Some(RibbonAction::SaveAs);
            }

            // Edit
            if icon_button(ui, "↩", "Undo (Ctrl+Z)", rcx.can_undo, is_dark).clicked() {
                action = Some(RibbonAction::Undo);
            }
            if icon_button(ui, "↪", "Redo (Ctrl+Y)", rcx.can_redo, is_dark).clicked() {
                action = Some(RibbonAction::Redo);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            let title = ui
                .add(
                    egui::Label::new(RichText::new(rcx.title).strong())
                        .sense(egui::Sense::click()),
                )
                .on_hover_text("Table of contents");
            if title.clicked() {
                action = Some(RibbonAction::TitleClick);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            if !self.collapsed {
                let visible = visible_items(items, rcx.view_mode.display_mode());
                egui::ScrollArea::horizontal()
                    .id_source("ribbon_actions")
                    .max_width(ui.available_width() - 80.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            for item in &visible {
                                let response =
                                    icon_button(ui, item.icon, item.label, true, is_dark);
                                if let Some(triggered) = action_for_response(item.id, &response) {
                                    action = Some(triggered);
                                }
                            }
                        });
                    });
            } else {
                ui.label(RichText::new("Actions hidden").size(10.0).color(muted));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);

                if icon_button(ui, "⚙", "Settings (Ctrl+,)", true, is_dark).clicked() {
                    action = Some(RibbonAction::OpenSettings);
                }
                if icon_button(ui, "🎨", "Change Theme", true, is_dark).clicked() {
                    action = Some(RibbonAction::CycleTheme);
                }

                let next = rcx.view_mode.toggle();
                let tooltip = format!("Switch to {} mode (Ctrl+E)", next.label());
                if icon_button(ui, next.icon(), &tooltip, true, is_dark).clicked() {
                    action = Some(RibbonAction::ToggleViewMode);
                }
            });
        });

        let rect = ui.min_rect();
        ui.painter().line_segment(
            [
                egui::pos2(rect.min.x, rect.max.y),
                egui::pos2(rect.max.x, rect.max.y),
            ],
            egui::Stroke::new(1.0, separator_color),
        );

        action
    }
}

/// Items shown while the editor is in `mode`.
pub fn visible_items(items: &[ActionItem], mode: DisplayMode) -> Vec<ActionItem> {
    items
        .iter()
        .filter(|item| item.mode.is_visible_in(mode))
        .copied()
        .collect()
}

fn action_for_response(id: ActionId, response: &Response) -> Option<RibbonAction> {
    if response.secondary_clicked() || response.long_touched() {
        Some(RibbonAction::LongClick(id))
    } else if response.clicked() {
        Some(RibbonAction::Click(id))
    } else {
        None
    }
}

/// Render an icon button with consistent styling.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool, is_dark: bool) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    // Invisible button as the clickable area; the glyph is painted on top
    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() && enabled {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
    }

    // Short text labels such as "H1" read better smaller than emoji
    let size = if icon.chars().count() > 1 && icon.is_ascii() {
        13.0
    } else {
        16.0
    };
    ui.painter().text(
        btn.rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(size),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::MarkdownActions;

    #[test]
    fn test_ribbon_toggle_collapsed() {
        let mut ribbon = Ribbon::new(false);
        assert!(!ribbon.is_collapsed());
        assert_eq!(ribbon.height(), RIBBON_HEIGHT_EXPANDED);

        ribbon.toggle_collapsed();
        assert!(ribbon.is_collapsed());
        assert_eq!(ribbon.height(), RIBBON_HEIGHT_COLLAPSED);
    }

    #[test]
    fn test_visible_items_follow_view_mode() {
        let items = MarkdownActions::action_list();

        let edit = visible_items(items, DisplayMode::Edit);
        assert!(edit.iter().any(|i| i.id == ActionId::Bold));
        assert!(!edit.iter().any(|i| i.id == ActionId::JumpTopBottom));

        let view = visible_items(items, DisplayMode::View);
        let ids: Vec<_> = view.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ActionId::JumpTopBottom, ActionId::TableOfContents]);
    }
}
