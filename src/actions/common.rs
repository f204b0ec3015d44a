//! Actions shared by every document format
//!
//! The Markdown dispatcher falls through to these for identifiers it does
//! not handle itself. Unknown identifiers return `false`.

use super::host::{ActionContext, DialogResult, LinkKind};
use super::ActionId;
use crate::editor::EditorBuffer;
use crate::error::ResultExt;
use crate::files::{self, list_snippets, load_snippet, take_cursor_placeholder};
use crate::markdown::{self, links, run_regex_replace_action};
use chrono::Local;
use log::{debug, warn};

const ACCORDION_SUMMARY: &str = "Details";

// ─────────────────────────────────────────────────────────────────────────────
// Click
// ─────────────────────────────────────────────────────────────────────────────

/// Handle a click on a shared action.
pub fn run_common_action(id: ActionId, cx: &mut ActionContext<'_>) -> bool {
    debug!("Common action: {:?}", id);
    match id {
        ActionId::DeleteLines => {
            delete_selected_lines(cx.editor);
            true
        }
        ActionId::NewLineBelow => {
            cx.editor.move_cursor_to_end_of_line(0);
            cx.editor.insert_or_replace_text_on_cursor("\n");
            true
        }
        ActionId::MoveLineUp => {
            move_selected_lines(cx.editor, true);
            true
        }
        ActionId::MoveLineDown => {
            move_selected_lines(cx.editor, false);
            true
        }
        ActionId::Indent => {
            let width = cx.settings.indent_size();
            run_regex_replace_action(cx.editor, &markdown::indent_lines(width));
            true
        }
        ActionId::Deindent => {
            let width = cx.settings.indent_size();
            run_regex_replace_action(cx.editor, &markdown::deindent_lines(width));
            true
        }
        ActionId::Accordion => {
            insert_accordion(cx.editor);
            true
        }
        ActionId::OpenLink => open_url_under_cursor(cx),
        ActionId::InsertLink => open_link_dialog(cx, LinkKind::Link),
        ActionId::InsertImage => open_link_dialog(cx, LinkKind::Image),
        ActionId::InsertAudio => open_link_dialog(cx, LinkKind::Audio),
        ActionId::SpecialKey => {
            cx.dialogs.show_special_key_dialog();
            true
        }
        ActionId::DateTime => {
            cx.dialogs.show_date_time_dialog();
            true
        }
        ActionId::InsertSnippet => {
            let snippets = match cx.settings.snippet_dir() {
                Some(dir) => list_snippets(dir).unwrap_or_warn_default(Vec::new(), "Listing snippets"),
                None => Vec::new(),
            };
            cx.dialogs.show_snippet_dialog(snippets);
            true
        }
        ActionId::JumpTopBottom => {
            let target = if cx.editor.selection_start() == 0 {
                cx.editor.len()
            } else {
                0
            };
            cx.editor.set_cursor(target);
            true
        }
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Long click
// ─────────────────────────────────────────────────────────────────────────────

/// Handle a long click on a shared action.
pub fn run_common_long_press_action(id: ActionId, cx: &mut ActionContext<'_>) -> bool {
    debug!("Common long action: {:?}", id);
    match id {
        ActionId::NewLineBelow => {
            // New line above the current one
            let start = cx.editor.line_start(cx.editor.selection_start());
            cx.editor.with_auto_format_disabled(|b| b.insert(start, "\n"));
            cx.editor.set_cursor(start);
            true
        }
        ActionId::DateTime => {
            let format = cx.settings.date_format().to_string();
            insert_date_time(cx.editor, &format);
            true
        }
        ActionId::JumpTopBottom => {
            cx.editor.set_cursor(cx.editor.len());
            true
        }
        ActionId::InsertLink => open_link_dialog(cx, LinkKind::Link),
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog results
// ─────────────────────────────────────────────────────────────────────────────

/// Apply the answer of a shared dialog. Returns false for results that
/// belong to a format-specific dispatcher.
pub fn apply_common_dialog_result(result: &DialogResult, cx: &mut ActionContext<'_>) -> bool {
    match result {
        DialogResult::InsertLink {
            kind,
            title,
            target,
        } => {
            let target = link_target_for_document(target, cx);
            let snippet = kind.format(title, &target);
            cx.editor.insert_or_replace_text_on_cursor(&snippet);
            cx.editor.request_focus();
            true
        }
        DialogResult::InsertDateTime { format } => {
            insert_date_time(cx.editor, format);
            cx.editor.request_focus();
            true
        }
        DialogResult::SpecialKey(key) => {
            cx.editor.simulate_key_press(*key);
            cx.editor.request_focus();
            true
        }
        DialogResult::InsertSnippet { path } => {
            let Some(text) = load_snippet(path)
                .map(Some)
                .unwrap_or_warn_default(None, "Loading snippet")
            else {
                return true;
            };
            let expanded = files::expand_snippet(&text, &cx.document_title(), Local::now());
            let (expanded, caret) = take_cursor_placeholder(&expanded);
            let start = cx.editor.selection_start();
            cx.editor.insert_or_replace_text_on_cursor(&expanded);
            if let Some(caret) = caret {
                cx.editor.set_cursor(start + caret);
            }
            cx.editor.request_focus();
            true
        }
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn open_link_dialog(cx: &mut ActionContext<'_>, kind: LinkKind) -> bool {
    let title = cx.editor.selected_text().to_string();
    cx.dialogs.show_insert_link_dialog(kind, title);
    true
}

/// Open a bare web URL under the caret.
fn open_url_under_cursor(cx: &mut ActionContext<'_>) -> bool {
    let caret = cx.editor.selection_start();
    let line_start = cx.editor.line_start(caret);
    let line = cx.editor.line_at(caret);
    match links::url_at(line, caret - line_start) {
        Some(url) => {
            let url = url.to_string();
            debug!("Opening URL under cursor: {}", url);
            cx.navigator.open_url(&url);
            true
        }
        None => false,
    }
}

/// Absolute file targets become relative to the document's folder.
fn link_target_for_document(target: &str, cx: &ActionContext<'_>) -> String {
    let path = std::path::Path::new(target);
    match cx.document_dir() {
        Some(dir) if path.is_absolute() && !links::is_web_url(target) => files::relative_to(path, dir)
            .to_string_lossy()
            .replace('\\', "/"),
        _ => target.to_string(),
    }
}

fn insert_date_time(buffer: &mut EditorBuffer, format: &str) {
    match files::format_date_time(format, Local::now()) {
        Some(formatted) => buffer.insert_or_replace_text_on_cursor(&formatted),
        None => warn!("Invalid date format '{}'", format),
    }
}

fn delete_selected_lines(buffer: &mut EditorBuffer) {
    let (start, end) = buffer.selected_lines();
    let (from, to) = if end < buffer.len() {
        (start, end + 1)
    } else if start > 0 {
        (start - 1, end)
    } else {
        (start, end)
    };
    buffer.delete(from, to);
    buffer.set_cursor(from);
    buffer.move_cursor_to_begin_of_line(0);
}

/// Swap the selected lines with the line above or below, keeping them selected.
fn move_selected_lines(buffer: &mut EditorBuffer, up: bool) {
    let (sel_start, sel_end) = buffer.selection();
    let (start, end) = buffer.selected_lines();
    let block = buffer.text()[start..end].to_string();

    if up {
        if start == 0 {
            return;
        }
        let prev_start = buffer.line_start(start - 1);
        let prev = buffer.text()[prev_start..start - 1].to_string();
        let swapped = format!("{}\n{}", block, prev);
        buffer.with_auto_format_disabled(|b| b.replace(prev_start, end, &swapped));
        let shift = start - prev_start;
        buffer.set_selection(sel_start - shift, sel_end - shift);
    } else {
        if end >= buffer.len() {
            return;
        }
        let next_end = buffer.line_end(end + 1);
        let next = buffer.text()[end + 1..next_end].to_string();
        let swapped = format!("{}\n{}", next, block);
        buffer.with_auto_format_disabled(|b| b.replace(start, next_end, &swapped));
        let shift = next.len() + 1;
        buffer.set_selection(sel_start + shift, sel_end + shift);
    }
}

fn insert_accordion(buffer: &mut EditorBuffer) {
    let summary = if buffer.has_selection() {
        buffer.selected_text().to_string()
    } else {
        ACCORDION_SUMMARY.to_string()
    };
    let head = format!("<details markdown='1'><summary>{}</summary>\n\n", summary);
    let start = buffer.selection_start();
    buffer.with_auto_format_disabled(|b| {
        b.insert_or_replace_text_on_cursor(&format!("{}\n\n</details>", head));
    });
    buffer.set_cursor(start + head.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{DialogCall, Harness};
    use crate::editor::EditorKey;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_delete_lines() {
        let mut h = Harness::new("one\ntwo\nthree", 5);
        assert!(run_common_action(ActionId::DeleteLines, &mut h.cx()));
        assert_eq!(h.buffer.text(), "one\nthree");
        assert_eq!(h.buffer.selection(), (4, 4));

        let mut h = Harness::new("one\ntwo", 6);
        run_common_action(ActionId::DeleteLines, &mut h.cx());
        assert_eq!(h.buffer.text(), "one");
        assert_eq!(h.buffer.selection(), (0, 0));
    }

    #[test]
    fn test_new_line_below_continues_list() {
        let mut h = Harness::new("- a\nb", 1);
        run_common_action(ActionId::NewLineBelow, &mut h.cx());
        assert_eq!(h.buffer.text(), "- a\n- \nb");
        assert_eq!(h.buffer.selection(), (6, 6));
    }

    #[test]
    fn test_new_line_above() {
        let mut h = Harness::new("- a\n- b", 5);
        assert!(run_common_long_press_action(ActionId::NewLineBelow, &mut h.cx()));
        assert_eq!(h.buffer.text(), "- a\n\n- b");
        assert_eq!(h.buffer.selection(), (4, 4));
    }

    #[test]
    fn test_move_lines() {
        let mut h = Harness::new("a\nbb\nc", 3);
        run_common_action(ActionId::MoveLineUp, &mut h.cx());
        assert_eq!(h.buffer.text(), "bb\na\nc");
        assert_eq!(h.buffer.selection(), (1, 1));

        run_common_action(ActionId::MoveLineDown, &mut h.cx());
        run_common_action(ActionId::MoveLineDown, &mut h.cx());
        assert_eq!(h.buffer.text(), "a\nc\nbb");
        assert_eq!(h.buffer.selection(), (5, 5));

        // Already at the bottom
        run_common_action(ActionId::MoveLineDown, &mut h.cx());
        assert_eq!(h.buffer.text(), "a\nc\nbb");
    }

    #[test]
    fn test_indent_deindent() {
        let mut h = Harness::new("a\n\nb", 0);
        h.buffer.set_selection(0, 4);
        run_common_action(ActionId::Indent, &mut h.cx());
        assert_eq!(h.buffer.text(), "  a\n\n  b");
        run_common_action(ActionId::Deindent, &mut h.cx());
        assert_eq!(h.buffer.text(), "a\n\nb");
    }

    #[test]
    fn test_accordion() {
        let mut h = Harness::new("", 0);
        run_common_action(ActionId::Accordion, &mut h.cx());
        assert_eq!(
            h.buffer.text(),
            "<details markdown='1'><summary>Details</summary>\n\n\n\n</details>"
        );
        let caret = h.buffer.selection_start();
        assert_eq!(&h.buffer.text()[caret - 2..caret], "\n\n");
    }

    #[test]
    fn test_open_bare_url() {
        let mut h = Harness::new("see https://example.org here", 8);
        assert!(run_common_action(ActionId::OpenLink, &mut h.cx()));
        assert_eq!(h.navigator.urls, vec!["https://example.org".to_string()]);

        let mut h = Harness::new("no url", 2);
        assert!(!run_common_action(ActionId::OpenLink, &mut h.cx()));
    }

    #[test]
    fn test_link_dialog_prefills_selection() {
        let mut h = Harness::new("click here", 0);
        h.buffer.set_selection(6, 10);
        run_common_action(ActionId::InsertImage, &mut h.cx());
        assert_eq!(
            h.dialogs.calls,
            vec![DialogCall::InsertLink(LinkKind::Image, "here".to_string())]
        );
    }

    #[test]
    fn test_insert_link_result_relative_to_document() {
        let mut h = Harness::new("", 0);
        h.document = Some("/notes/today.md".into());
        let result = DialogResult::InsertLink {
            kind: LinkKind::Link,
            title: "Plan".into(),
            target: "/notes/projects/plan.md".into(),
        };
        assert!(apply_common_dialog_result(&result, &mut h.cx()));
        assert_eq!(h.buffer.text(), "[Plan](projects/plan.md)");
    }

    #[test]
    fn test_date_time() {
        let mut h = Harness::new("", 0);
        h.settings.date_format = "fixed".into();
        assert!(run_common_long_press_action(ActionId::DateTime, &mut h.cx()));
        assert_eq!(h.buffer.text(), "fixed");

        run_common_action(ActionId::DateTime, &mut h.cx());
        assert_eq!(h.dialogs.calls, vec![DialogCall::DateTime]);
    }

    #[test]
    fn test_snippet_dialog_and_insert() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sig.md"), "-- {{title}}{{cursor}}!").unwrap();

        let mut h = Harness::new("x", 1);
        h.settings.snippet_dir = Some(dir.path().to_path_buf());
        h.document = Some(dir.path().join("letter.md"));
        run_common_action(ActionId::InsertSnippet, &mut h.cx());
        assert_eq!(h.dialogs.calls, vec![DialogCall::Snippets(vec!["sig".into()])]);

        let result = DialogResult::InsertSnippet {
            path: dir.path().join("sig.md"),
        };
        apply_common_dialog_result(&result, &mut h.cx());
        assert_eq!(h.buffer.text(), "x-- letter!");
        assert_eq!(h.buffer.selection(), (10, 10));
    }

    #[test]
    fn test_special_key_result() {
        let mut h = Harness::new("ab\ncd", 4);
        apply_common_dialog_result(&DialogResult::SpecialKey(EditorKey::Up), &mut h.cx());
        assert_eq!(h.buffer.selection(), (1, 1));
        assert!(h.buffer.take_focus_request());
    }

    #[test]
    fn test_jump_top_bottom() {
        let mut h = Harness::new("abc\ndef", 0);
        run_common_action(ActionId::JumpTopBottom, &mut h.cx());
        assert_eq!(h.buffer.selection(), (7, 7));
        run_common_action(ActionId::JumpTopBottom, &mut h.cx());
        assert_eq!(h.buffer.selection(), (0, 0));
        run_common_long_press_action(ActionId::JumpTopBottom, &mut h.cx());
        assert_eq!(h.buffer.selection(), (7, 7));
    }

    #[test]
    fn test_unknown_ids_not_handled() {
        let mut h = Harness::new("text", 0);
        assert!(!run_common_action(ActionId::Bold, &mut h.cx()));
        assert!(!run_common_long_press_action(ActionId::Quote, &mut h.cx()));
        assert_eq!(h.buffer.text(), "text");
    }
}
