//! Markdown toolbar actions
//!
//! `MarkdownActions` maps toolbar buttons to edits of the document buffer.
//! Each button is a prefix toggle (regex replace), an inline delimiter
//! toggle, a dialog, or a fall-through to the shared actions in
//! [`super::common`].

use super::common::{apply_common_dialog_result, run_common_action, run_common_long_press_action};
use super::host::{ActionContext, DialogResult};
use super::items::{ActionId, ActionItem, DisplayMode};
use crate::editor::{EditorBuffer, EditorKey};
use crate::files::{can_create, make_absolute};
use crate::markdown::{
    self, collect_headings, insert_horizontal_rule, links, run_inline_action,
    run_regex_replace_action, table_row_snippet,
};
use log::{debug, info};
use std::collections::BTreeSet;

const CODE_FENCE: &str = "\n```\n";

/// Markdown buttons in their default toolbar order.
const MARKDOWN_ACTIONS: &[ActionItem] = &[
    ActionItem::new(ActionId::CheckboxList, "☑", "Check list"),
    ActionItem::new(ActionId::UnorderedList, "•", "Unordered list"),
    ActionItem::new(ActionId::Bold, "𝐁", "Bold"),
    ActionItem::new(ActionId::Italic, "𝐼", "Italic"),
    ActionItem::new(ActionId::DeleteLines, "🗑", "Delete lines"),
    ActionItem::new(ActionId::OpenLink, "🌐", "Open link"),
    ActionItem::new(ActionId::InsertLink, "🔗", "Insert link"),
    ActionItem::new(ActionId::InsertImage, "🖼", "Insert image"),
    ActionItem::new(ActionId::InsertAudio, "🎤", "Audio"),
    ActionItem::new(ActionId::SpecialKey, "⌨", "Special key"),
    ActionItem::new(ActionId::DateTime, "🕓", "Date and time"),
    ActionItem::new(ActionId::InlineCode, "</>", "Inline code"),
    ActionItem::new(ActionId::OrderedList, "1.", "Ordered list"),
    ActionItem::new(ActionId::Table, "▦", "Table"),
    ActionItem::new(ActionId::Quote, "❝", "Quote"),
    ActionItem::new(ActionId::H1, "H1", "Heading 1"),
    ActionItem::new(ActionId::H2, "H2", "Heading 2"),
    ActionItem::new(ActionId::H3, "H3", "Heading 3"),
    ActionItem::new(ActionId::HorizontalLine, "—", "Horizontal line"),
    ActionItem::new(ActionId::Strikeout, "S̶", "Strikeout"),
    ActionItem::new(ActionId::Accordion, "▾", "Accordion"),
    ActionItem::new(ActionId::Indent, "⇥", "Indent"),
    ActionItem::new(ActionId::Deindent, "⇤", "Deindent"),
    ActionItem::new(ActionId::NewLineBelow, "↵", "Start new line below"),
    ActionItem::new(ActionId::MoveLineUp, "⬆", "Move text one line up"),
    ActionItem::new(ActionId::MoveLineDown, "⬇", "Move text one line down"),
    ActionItem::new(ActionId::InsertSnippet, "📋", "Insert snippet"),
    ActionItem::new(ActionId::JumpTopBottom, "↕", "Jump to bottom").with_mode(DisplayMode::View),
    ActionItem::new(ActionId::TableOfContents, "☰", "Table of contents")
        .with_mode(DisplayMode::View),
];

/// Dispatcher for the Markdown toolbar.
///
/// The only state is the set of heading levels hidden in the heading
/// picker, which persists across dialog sessions.
#[derive(Debug, Default)]
pub struct MarkdownActions {
    disabled_headings: BTreeSet<usize>,
}

impl MarkdownActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons offered for Markdown documents, in default order.
    pub fn action_list() -> &'static [ActionItem] {
        MARKDOWN_ACTIONS
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Click handlers
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a click. Returns whether the action was consumed.
    pub fn on_action_click(&mut self, id: ActionId, cx: &mut ActionContext<'_>) -> bool {
        debug!("Markdown action: {:?}", id);
        match id {
            ActionId::Quote => {
                run_regex_replace_action(cx.editor, &markdown::toggle_quote());
                true
            }
            ActionId::H1 | ActionId::H2 | ActionId::H3 => {
                let level = match id {
                    ActionId::H1 => 1,
                    ActionId::H2 => 2,
                    _ => 3,
                };
                run_regex_replace_action(
                    cx.editor,
                    &markdown::set_or_unset_heading_with_level(level),
                );
                true
            }
            ActionId::UnorderedList => {
                let list_char = cx.settings.unordered_list_char();
                run_regex_replace_action(
                    cx.editor,
                    &markdown::replace_with_unordered_list_prefix_or_remove_prefix(list_char),
                );
                true
            }
            ActionId::CheckboxList => {
                let list_char = cx.settings.unordered_list_char();
                run_regex_replace_action(
                    cx.editor,
                    &markdown::toggle_to_checked_or_unchecked_list_prefix(list_char),
                );
                true
            }
            ActionId::OrderedList => {
                run_regex_replace_action(
                    cx.editor,
                    &markdown::replace_with_ordered_list_prefix_or_remove_prefix(),
                );
                if cx.settings.renumber_ordered_lists() {
                    self.renumber_ordered_list(cx.editor);
                }
                true
            }
            ActionId::Bold => {
                run_inline_action(cx.editor, "**");
                true
            }
            ActionId::Italic => {
                run_inline_action(cx.editor, "_");
                true
            }
            ActionId::Strikeout => {
                run_inline_action(cx.editor, "~~");
                true
            }
            ActionId::InlineCode => {
                run_inline_action(cx.editor, "`");
                true
            }
            ActionId::HorizontalLine => {
                insert_horizontal_rule(cx.editor);
                true
            }
            ActionId::Table => {
                cx.dialogs.show_insert_table_row_dialog(false);
                true
            }
            ActionId::OpenLink if self.follow_link_under_cursor(cx) => true,
            ActionId::TableOfContents => self.run_title_click(cx),
            _ => run_common_action(id, cx),
        }
    }

    /// Handle a long click (secondary click or long touch).
    pub fn on_action_long_click(&mut self, id: ActionId, cx: &mut ActionContext<'_>) -> bool {
        debug!("Markdown long action: {:?}", id);
        match id {
            ActionId::Table => {
                cx.dialogs.show_insert_table_row_dialog(true);
                true
            }
            ActionId::InlineCode => {
                wrap_lines_in_code_fence(cx.editor);
                true
            }
            _ => run_common_long_press_action(id, cx),
        }
    }

    /// Open the heading picker for the current document.
    pub fn run_title_click(&mut self, cx: &mut ActionContext<'_>) -> bool {
        let headings = collect_headings(cx.editor.text());
        cx.dialogs
            .show_headline_dialog(headings, self.disabled_headings.clone());
        true
    }

    pub fn set_heading_level_disabled(&mut self, level: usize, disabled: bool) {
        if disabled {
            self.disabled_headings.insert(level);
        } else {
            self.disabled_headings.remove(&level);
        }
    }

    pub fn renumber_ordered_list(&self, buffer: &mut EditorBuffer) {
        markdown::renumber_ordered_list(buffer);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Link following
    // ─────────────────────────────────────────────────────────────────────────

    /// Follow the Markdown link under the caret.
    ///
    /// Web URLs are opened externally. Other targets are resolved against
    /// the document's folder and opened if the path exists or could be
    /// created. Anchors and folders are not followed. Returns false when no
    /// link was followed.
    pub fn follow_link_under_cursor(&self, cx: &mut ActionContext<'_>) -> bool {
        let caret = cx.editor.selection_start();
        let line_start = cx.editor.line_start(caret);
        let cursor = caret - line_start;
        let line = cx.editor.line_at(caret).to_string();

        for link in links::links_in_line(&line).filter(|l| l.contains(cursor)) {
            if links::is_web_url(link.target) {
                info!("Opening web link: {}", link.target);
                cx.navigator.open_url(link.target);
                return true;
            }

            if link.target.trim_start_matches('<').starts_with('#') {
                debug!("In-page anchor '{}' is not a document", link.target);
                continue;
            }
            let Some(base) = cx.document_dir() else {
                debug!("Unsaved document, cannot resolve '{}'", link.target);
                continue;
            };
            let path = make_absolute(link.target, base);
            if path.is_dir() {
                debug!("Link target is a folder: {}", path.display());
                continue;
            }
            if can_create(&path) {
                info!("Opening linked document: {}", path.display());
                cx.navigator.open_document(&path);
                return true;
            }
            debug!("Link target not creatable: {}", path.display());
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Table rows
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an empty row of `cols` cells at the end of the caret line.
    ///
    /// With `header` a separator row follows and the caret ends on the new
    /// first row; otherwise it ends at the start of the inserted row.
    pub fn insert_table_row(&self, buffer: &mut EditorBuffer, cols: usize, header: bool) {
        buffer.request_focus();

        let caret = buffer.selection_start();
        let line_empty = buffer.line_start(caret) == buffer.line_end(caret);
        let snippet = table_row_snippet(cols, header, line_empty);

        buffer.move_cursor_to_end_of_line(0);
        buffer.insert_or_replace_text_on_cursor(&snippet);
        buffer.move_cursor_to_begin_of_line(0);
        if header {
            buffer.simulate_key_press(EditorKey::Up);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialog results
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply the answer of a dialog opened by one of the handlers.
    pub fn apply_dialog_result(&mut self, result: &DialogResult, cx: &mut ActionContext<'_>) -> bool {
        match result {
            DialogResult::InsertTableRow { cols, header } => {
                self.insert_table_row(cx.editor, *cols, *header);
                true
            }
            DialogResult::JumpToHeading { offset } => {
                cx.editor.set_cursor(*offset);
                cx.editor.move_cursor_to_end_of_line(0);
                cx.editor.request_focus();
                true
            }
            DialogResult::HeadingLevelToggled { level, disabled } => {
                self.set_heading_level_disabled(*level, *disabled);
                true
            }
            other => apply_common_dialog_result(other, cx),
        }
    }
}

/// Wrap the selected lines in a fenced code block; caret after the opening fence.
fn wrap_lines_in_code_fence(buffer: &mut EditorBuffer) {
    buffer.with_auto_format_disabled(|b| {
        let original = b.set_selection_expand_whole_lines();
        b.insert(b.selection_start(), CODE_FENCE);
        b.insert(b.selection_end(), CODE_FENCE);
        b.set_cursor(original + CODE_FENCE.len());
    });
}
