//! Toolbar action identifiers and layout

use serde::{Deserialize, Serialize};

/// Identifies one toolbar button.
///
/// Stored in settings by its kebab-case key (see [`ActionId::key`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionId {
    CheckboxList,
    UnorderedList,
    Bold,
    Italic,
    DeleteLines,
    OpenLink,
    InsertLink,
    InsertImage,
    InsertAudio,
    SpecialKey,
    DateTime,
    InlineCode,
    OrderedList,
    Table,
    Quote,
    H1,
    H2,
    H3,
    HorizontalLine,
    Strikeout,
    Accordion,
    Indent,
    Deindent,
    NewLineBelow,
    MoveLineUp,
    MoveLineDown,
    InsertSnippet,
    JumpTopBottom,
    TableOfContents,
}

impl ActionId {
    pub fn all() -> &'static [ActionId] {
        &[
            ActionId::CheckboxList,
            ActionId::UnorderedList,
            ActionId::Bold,
            ActionId::Italic,
            ActionId::DeleteLines,
            ActionId::OpenLink,
            ActionId::InsertLink,
            ActionId::InsertImage,
            ActionId::InsertAudio,
            ActionId::SpecialKey,
            ActionId::DateTime,
            ActionId::InlineCode,
            ActionId::OrderedList,
            ActionId::Table,
            ActionId::Quote,
            ActionId::H1,
            ActionId::H2,
            ActionId::H3,
            ActionId::HorizontalLine,
            ActionId::Strikeout,
            ActionId::Accordion,
            ActionId::Indent,
            ActionId::Deindent,
            ActionId::NewLineBelow,
            ActionId::MoveLineUp,
            ActionId::MoveLineDown,
            ActionId::InsertSnippet,
            ActionId::JumpTopBottom,
            ActionId::TableOfContents,
        ]
    }

    /// Stable key used in the settings file.
    pub fn key(&self) -> &'static str {
        match self {
            ActionId::CheckboxList => "checkbox-list",
            ActionId::UnorderedList => "unordered-list",
            ActionId::Bold => "bold",
            ActionId::Italic => "italic",
            ActionId::DeleteLines => "delete-lines",
            ActionId::OpenLink => "open-link",
            ActionId::InsertLink => "insert-link",
            ActionId::InsertImage => "insert-image",
            ActionId::InsertAudio => "insert-audio",
            ActionId::SpecialKey => "special-key",
            ActionId::DateTime => "date-time",
            ActionId::InlineCode => "inline-code",
            ActionId::OrderedList => "ordered-list",
            ActionId::Table => "table",
            ActionId::Quote => "quote",
            ActionId::H1 => "h1",
            ActionId::H2 => "h2",
            ActionId::H3 => "h3",
            ActionId::HorizontalLine => "horizontal-line",
            ActionId::Strikeout => "strikeout",
            ActionId::Accordion => "accordion",
            ActionId::Indent => "indent",
            ActionId::Deindent => "deindent",
            ActionId::NewLineBelow => "new-line-below",
            ActionId::MoveLineUp => "move-line-up",
            ActionId::MoveLineDown => "move-line-down",
            ActionId::InsertSnippet => "insert-snippet",
            ActionId::JumpTopBottom => "jump-top-bottom",
            ActionId::TableOfContents => "table-of-contents",
        }
    }

    pub fn from_key(key: &str) -> Option<ActionId> {
        Self::all().iter().copied().find(|id| id.key() == key)
    }
}

/// Editor mode in which an action is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Edit,
    View,
    Any,
}

impl DisplayMode {
    /// Whether an item with this mode is shown while the host is in `current`.
    pub fn is_visible_in(&self, current: DisplayMode) -> bool {
        *self == DisplayMode::Any || current == DisplayMode::Any || *self == current
    }
}

/// A toolbar button: action, icon glyph, label and display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionItem {
    pub id: ActionId,
    pub icon: &'static str,
    pub label: &'static str,
    pub mode: DisplayMode,
}

impl ActionItem {
    pub const fn new(id: ActionId, icon: &'static str, label: &'static str) -> Self {
        Self {
            id,
            icon,
            label,
            mode: DisplayMode::Edit,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// User ordering and visibility of toolbar buttons, persisted in settings.
///
/// Keys that no longer name an action are ignored; actions missing from
/// `order` are appended in their default position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLayout {
    pub order: Vec<String>,
    pub hidden: Vec<String>,
}

impl ActionLayout {
    /// Reorder and filter `defaults` according to this layout.
    pub fn apply(&self, defaults: &[ActionItem]) -> Vec<ActionItem> {
        let mut items: Vec<ActionItem> = Vec::with_capacity(defaults.len());

        for key in &self.order {
            if let Some(item) = defaults.iter().find(|item| item.id.key() == key) {
                if !items.iter().any(|i| i.id == item.id) {
                    items.push(*item);
                }
            }
        }
        for item in defaults {
            if !items.iter().any(|i| i.id == item.id) {
                items.push(*item);
            }
        }

        items.retain(|item| !self.is_hidden(item.id));
        items
    }

    pub fn is_hidden(&self, id: ActionId) -> bool {
        self.hidden.iter().any(|key| key == id.key())
    }

    pub fn set_hidden(&mut self, id: ActionId, hidden: bool) {
        self.hidden.retain(|key| key != id.key());
        if hidden {
            self.hidden.push(id.key().to_string());
        }
    }

    /// Move `id` one place towards the front (`-1`) or back (`1`) of `current`.
    pub fn move_item(&mut self, current: &[ActionItem], id: ActionId, delta: isize) {
        let mut keys: Vec<String> = current.iter().map(|i| i.id.key().to_string()).collect();
        if let Some(pos) = keys.iter().position(|k| k == id.key()) {
            let target = pos as isize + delta;
            if target >= 0 && (target as usize) < keys.len() {
                keys.swap(pos, target as usize);
            }
        }
        self.order = keys;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ActionItem> {
        vec![
            ActionItem::new(ActionId::Bold, "B", "Bold"),
            ActionItem::new(ActionId::Italic, "I", "Italic"),
            ActionItem::new(ActionId::Quote, ">", "Quote"),
        ]
    }

    #[test]
    fn test_keys_roundtrip_through_serde() {
        for id in ActionId::all() {
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.key()));
            assert_eq!(ActionId::from_key(id.key()), Some(*id));
        }
        assert_eq!(ActionId::from_key("rotate-screen"), None);
    }

    #[test]
    fn test_layout_default_keeps_order() {
        let layout = ActionLayout::default();
        let ids: Vec<_> = layout.apply(&items()).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ActionId::Bold, ActionId::Italic, ActionId::Quote]);
    }

    #[test]
    fn test_layout_reorders_hides_and_appends() {
        let layout = ActionLayout {
            order: vec!["quote".into(), "unknown".into(), "bold".into()],
            hidden: vec!["bold".into()],
        };
        let ids: Vec<_> = layout.apply(&items()).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ActionId::Quote, ActionId::Italic]);
    }

    #[test]
    fn test_move_item() {
        let mut layout = ActionLayout::default();
        let current = layout.apply(&items());
        layout.move_item(&current, ActionId::Quote, -1);
        let ids: Vec<_> = layout.apply(&items()).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ActionId::Bold, ActionId::Quote, ActionId::Italic]);

        // Moving past the front is ignored
        let current = layout.apply(&items());
        layout.move_item(&current, ActionId::Bold, -1);
        assert_eq!(layout.apply(&items())[0].id, ActionId::Bold);
    }

    #[test]
    fn test_display_mode_visibility() {
        assert!(DisplayMode::Edit.is_visible_in(DisplayMode::Edit));
        assert!(!DisplayMode::View.is_visible_in(DisplayMode::Edit));
        assert!(DisplayMode::Any.is_visible_in(DisplayMode::View));
    }
}
